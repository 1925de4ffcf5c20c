//! `brickplace-core` — shared domain primitives.
//!
//! This crate contains **pure domain** building blocks (no I/O, no XML):
//! the BrickStore type/condition codes and the error taxonomy used across
//! the workspace.

pub mod error;
pub mod item;

pub use error::{CoreError, CoreResult};
pub use item::{Condition, ItemType};
