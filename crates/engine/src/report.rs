//! Structured results of one processing pass.

use chrono::{DateTime, Utc};
use serde::Serialize;

use brickplace_core::Condition;

/// One proposed (or applied) location assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub item_id: String,
    pub item_name: String,
    pub color_name: String,
    pub condition: Condition,
    pub quantity: i64,
    pub assigned_location: String,
}

/// An item for which no known location could be inferred. This is a normal
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedItem {
    pub item_id: String,
    pub item_name: String,
    pub color_name: String,
    pub condition: Condition,
    pub quantity: i64,
}

/// Aggregated outcome of a pass, suitable for display or JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentReport {
    pub total_processed: usize,
    pub assigned_count: usize,
    pub unmatched_count: usize,
    /// Percentage of candidates that received a location, rounded to one
    /// decimal; `0.0` when there were no candidates.
    pub success_rate: f64,
    pub assignments: Vec<Assignment>,
    pub unmatched: Vec<UnmatchedItem>,
    pub generated_at: DateTime<Utc>,
}

impl AssignmentReport {
    pub(crate) fn new(assignments: Vec<Assignment>, unmatched: Vec<UnmatchedItem>) -> Self {
        let assigned_count = assignments.len();
        let unmatched_count = unmatched.len();
        let total_processed = assigned_count + unmatched_count;
        let success_rate = if total_processed == 0 {
            0.0
        } else {
            let rate = assigned_count as f64 / total_processed as f64 * 100.0;
            (rate * 10.0).round() / 10.0
        };

        Self {
            total_processed,
            assigned_count,
            unmatched_count,
            success_rate,
            assignments,
            unmatched,
            generated_at: Utc::now(),
        }
    }
}
