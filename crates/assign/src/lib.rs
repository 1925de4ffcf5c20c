//! `brickplace-assign` — the storage-location selection heuristic.
//!
//! A pure, stateless decision procedure: given a target item and the known
//! location usage for that item id, pick exactly one best location or none.
//! All inputs are explicit arguments; the same inputs always produce the
//! same output.

pub mod assigner;

pub use assigner::{select_location, zone_priority};
