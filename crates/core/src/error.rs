//! Error taxonomy.

use thiserror::Error;

/// Result type used across the workspace.
pub type CoreResult<T> = Result<T, CoreError>;

/// Structural failures.
///
/// These abort the whole operation and are surfaced to the caller. Per-item
/// parse problems are *not* represented here: a malformed item block is
/// logged and skipped during load, and "no match" from the assigner is a
/// normal report outcome, not an error.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document is not well-formed, has the wrong root element, or an
    /// internal node handle no longer resolves.
    #[error("parse error: {0}")]
    Parse(String),

    /// File read/write failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A processing pass was requested before an inventory index existed.
    #[error("inventory index not built")]
    IndexNotBuilt,
}

impl CoreError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
