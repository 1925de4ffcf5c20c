//! `brickplace-document` — lossless BrickStore (BSX) document model.
//!
//! A BSX file is parsed into an owned XML tree plus a typed overlay per
//! `Item` element. Only a small fixed field set is modeled; everything else
//! (unknown child elements, attributes, nested structures) is retained in
//! the tree and re-emitted verbatim on save. The single supported mutation
//! is updating an item's storage location (its `Remarks` field), which goes
//! through [`Document::set_location`] so the tree and the overlay never
//! drift apart.

pub mod document;
pub mod xml;

pub use document::{Document, DocumentSummary, ItemRecord};
pub use xml::{XmlElement, XmlNode};
