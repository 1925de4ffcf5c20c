//! `brickplace-inventory` — location-usage index over a store inventory.
//!
//! Consumes the flat record sequence produced by an external inventory
//! provider and builds an immutable per-item view of which storage locations
//! already hold stock of each catalog item. Pure data transformation: no
//! I/O, no network, input is never mutated.

pub mod index;

pub use index::{ExternalInventoryRecord, IndexStatistics, InventoryIndex, LocationUsageEntry};
