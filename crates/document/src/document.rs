//! The BSX document: structural skeleton plus typed item overlay.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use brickplace_core::{Condition, CoreError, CoreResult, ItemType};

use crate::xml::{self, XmlElement, XmlNode};

const ROOT_TAG: &str = "BrickStoreXML";
const ITEM_TAG: &str = "Item";
const REMARKS_TAG: &str = "Remarks";

/// Child-index path from the document root to an item's preserved node.
type NodePath = Vec<usize>;

/// Typed overlay over one `Item` element.
///
/// Only the fields needed for inspection and location matching are modeled;
/// the full original subtree stays in the document tree and is what gets
/// serialized. Records can only be obtained from a [`Document`], and the
/// location field is only writable through [`Document::set_location`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    pub item_id: String,
    pub item_type: ItemType,
    pub color_id: String,
    pub color_name: String,
    pub category_id: String,
    pub category_name: String,
    pub item_name: String,
    pub quantity: i64,
    pub price: f64,
    pub condition: Condition,
    /// Storage location (the BSX `Remarks` field); empty means unassigned.
    pub location: String,
    #[serde(skip)]
    node: NodePath,
}

impl ItemRecord {
    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }
}

/// Aggregate counts over a loaded document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub total_lots: usize,
    pub total_quantity: i64,
    pub with_location: usize,
    pub without_location: usize,
    pub quantity_by_type: BTreeMap<String, i64>,
    pub quantity_by_condition: BTreeMap<String, i64>,
}

/// A loaded BSX document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: XmlElement,
    items: Vec<ItemRecord>,
}

impl Document {
    /// Read and parse a BSX file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)?;
        let doc = Self::from_xml_str(&src)?;
        info!(path = %path.display(), lots = doc.items.len(), "loaded document");
        Ok(doc)
    }

    /// Parse a BSX document from a string.
    ///
    /// Fails if the markup is malformed or the root element is not
    /// `BrickStoreXML`. A malformed item block (one without an `ItemID`) is
    /// logged and skipped; one bad record must not block the rest.
    pub fn from_xml_str(src: &str) -> CoreResult<Self> {
        let root = xml::parse(src)?;
        if root.name() != ROOT_TAG {
            return Err(CoreError::parse(format!(
                "unexpected root element <{}>, expected <{ROOT_TAG}>",
                root.name()
            )));
        }

        let mut items = Vec::new();
        collect_items(&root, &mut Vec::new(), &mut items);
        Ok(Self { root, items })
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn items_with_location(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.iter().filter(|item| item.has_location())
    }

    /// Items lacking a location, with their index for use in
    /// [`Document::set_location`].
    pub fn items_without_location(&self) -> impl Iterator<Item = (usize, &ItemRecord)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.has_location())
    }

    /// Update one item's storage location.
    ///
    /// Writes through to the preserved node (finding or creating its
    /// `Remarks` child) and mirrors the value into the typed record, so the
    /// tree and overlay stay consistent. Fails only if the record's node
    /// handle no longer resolves, which cannot happen for records obtained
    /// from a successful load.
    pub fn set_location(&mut self, index: usize, location: &str) -> CoreResult<()> {
        let (item_id, path) = {
            let record = self
                .items
                .get(index)
                .ok_or_else(|| CoreError::parse(format!("no item at index {index}")))?;
            (record.item_id.clone(), record.node.clone())
        };

        let node = descend_mut(&mut self.root, &path).ok_or_else(|| {
            CoreError::parse(format!("preserved node missing for item {item_id}"))
        })?;

        match node.child_element_mut(REMARKS_TAG) {
            Some(remarks) => remarks.set_text(location),
            None => {
                let mut remarks = XmlElement::new(REMARKS_TAG);
                remarks.set_text(location);
                node.push_child(XmlNode::Element(remarks));
            }
        }

        self.items[index].location = location.to_string();
        Ok(())
    }

    /// Serialize the skeleton and all item nodes in original order.
    pub fn to_xml_string(&self) -> CoreResult<String> {
        xml::serialize(&self.root)
    }

    /// Serialize and write to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let out = self.to_xml_string()?;
        fs::write(path, out)?;
        info!(path = %path.display(), "saved document");
        Ok(())
    }

    pub fn summary(&self) -> DocumentSummary {
        let mut quantity_by_type = BTreeMap::new();
        let mut quantity_by_condition = BTreeMap::new();
        let mut total_quantity = 0;
        let mut with_location = 0;

        for item in &self.items {
            total_quantity += item.quantity;
            if item.has_location() {
                with_location += 1;
            }
            *quantity_by_type
                .entry(item.item_type.label().to_string())
                .or_insert(0) += item.quantity;
            *quantity_by_condition
                .entry(item.condition.to_string())
                .or_insert(0) += item.quantity;
        }

        DocumentSummary {
            total_lots: self.items.len(),
            total_quantity,
            with_location,
            without_location: self.items.len() - with_location,
            quantity_by_type,
            quantity_by_condition,
        }
    }
}

fn collect_items(element: &XmlElement, path: &mut NodePath, items: &mut Vec<ItemRecord>) {
    for (index, node) in element.children().iter().enumerate() {
        let XmlNode::Element(child) = node else {
            continue;
        };
        path.push(index);
        if child.name() == ITEM_TAG {
            match parse_item(child, path.clone()) {
                Some(record) => items.push(record),
                None => warn!("skipping item block without an ItemID"),
            }
        } else {
            collect_items(child, path, items);
        }
        path.pop();
    }
}

/// Extract the typed field set from one `Item` element, with per-field
/// defaults matching the BSX conventions. Returns `None` when the block has
/// no usable `ItemID`.
fn parse_item(element: &XmlElement, node: NodePath) -> Option<ItemRecord> {
    let item_id = child_text(element, "ItemID");
    if item_id.is_empty() {
        return None;
    }

    let type_code = child_text_or(element, "ItemTypeID", "P");
    let item_type = ItemType::from_code(&type_code).unwrap_or(ItemType::Part);

    let quantity = child_text_or(element, "Qty", "1").parse().unwrap_or(1);
    let price = child_text_or(element, "Price", "0.00").parse().unwrap_or(0.0);

    let condition =
        Condition::from_code(&child_text_or(element, "Condition", "N")).unwrap_or(Condition::New);

    Some(ItemRecord {
        item_id,
        item_type,
        color_id: child_text_or(element, "ColorID", "0"),
        color_name: child_text_or(element, "ColorName", "Unknown"),
        category_id: child_text_or(element, "CategoryID", "0"),
        category_name: child_text_or(element, "CategoryName", "Unknown"),
        item_name: child_text_or(element, "ItemName", "Unknown Item"),
        quantity,
        price,
        condition,
        location: child_text(element, REMARKS_TAG),
        node,
    })
}

fn child_text(element: &XmlElement, name: &str) -> String {
    element
        .child_element(name)
        .map(|child| child.text().trim().to_string())
        .unwrap_or_default()
}

fn child_text_or(element: &XmlElement, name: &str, default: &str) -> String {
    let text = child_text(element, name);
    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

fn descend_mut<'a>(root: &'a mut XmlElement, path: &[usize]) -> Option<&'a mut XmlElement> {
    let mut current = root;
    for &index in path {
        match current.children.get_mut(index) {
            Some(XmlNode::Element(child)) => current = child,
            _ => return None,
        }
    }
    Some(current)
}
