//! `brickplace-engine` — drives a full assignment pass over a document.
//!
//! For every item in a loaded BSX document that lacks a storage location,
//! the engine consults the inventory index and the selection heuristic, and
//! either records the proposal (preview) or writes it back into the
//! document (apply), producing a structured report either way. No I/O, no
//! network: everything operates on already-loaded structures.

pub mod engine;
pub mod report;

pub use engine::{AssignmentEngine, ProcessMode};
pub use report::{Assignment, AssignmentReport, UnmatchedItem};
