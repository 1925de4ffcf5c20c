//! BrickStore item type and condition codes.

use serde::{Deserialize, Serialize};

/// Catalog item kind, encoded in BSX as a single-letter `ItemTypeID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Part,
    Minifig,
    Set,
    Book,
    Gear,
    Instruction,
    Box,
}

impl ItemType {
    /// Parse a BSX type code. Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "P" => Some(Self::Part),
            "M" => Some(Self::Minifig),
            "S" => Some(Self::Set),
            "B" => Some(Self::Book),
            "G" => Some(Self::Gear),
            "I" => Some(Self::Instruction),
            "O" => Some(Self::Box),
            _ => None,
        }
    }

    /// The single-letter code used in BSX files.
    pub fn code(self) -> &'static str {
        match self {
            Self::Part => "P",
            Self::Minifig => "M",
            Self::Set => "S",
            Self::Book => "B",
            Self::Gear => "G",
            Self::Instruction => "I",
            Self::Box => "O",
        }
    }

    /// Human-readable label, as shown in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::Part => "Parts",
            Self::Minifig => "Minifigures",
            Self::Set => "Sets",
            Self::Book => "Books",
            Self::Gear => "Gear",
            Self::Instruction => "Instructions",
            Self::Box => "Original Boxes",
        }
    }
}

impl core::fmt::Display for ItemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Item condition, encoded in BSX as `N` (new) or `U` (used).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Self::New),
            "U" => Some(Self::Used),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::New => "N",
            Self::Used => "U",
        }
    }
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::New => f.write_str("New"),
            Self::Used => f.write_str("Used"),
        }
    }
}
