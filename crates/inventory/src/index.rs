//! Building and querying the item-to-locations index.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use brickplace_core::Condition;

/// One inventory lot as reported by the external provider, reduced to the
/// fields the index cares about. `location_text` is the provider's
/// remarks-equivalent free-text field; blank means the lot is stored
/// nowhere in particular and contributes nothing to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInventoryRecord {
    pub item_id: String,
    pub color_id: String,
    pub quantity: i64,
    pub condition: Condition,
    pub location_text: String,
}

/// Known stock of an item at one location, for one color and condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationUsageEntry {
    pub location: String,
    pub quantity: i64,
    pub condition: Condition,
    pub color_id: String,
}

/// Immutable mapping from item id to its known location-usage entries.
///
/// Built once per provider fetch and never mutated afterwards; concurrent
/// read-only use across processing passes is safe by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryIndex {
    entries: HashMap<String, Vec<LocationUsageEntry>>,
    total_entries: usize,
}

impl InventoryIndex {
    /// Build the index from a complete record sequence.
    ///
    /// Records with blank location text are dropped. Within an item,
    /// duplicate `(location, color, condition)` combinations are merged by
    /// summing their quantities; distinct entries keep first-seen order.
    pub fn build(records: impl IntoIterator<Item = ExternalInventoryRecord>) -> Self {
        let mut entries: HashMap<String, Vec<LocationUsageEntry>> = HashMap::new();
        let mut total_records = 0usize;
        let mut total_entries = 0usize;

        for record in records {
            total_records += 1;
            let location = record.location_text.trim();
            if record.item_id.is_empty() || location.is_empty() {
                continue;
            }

            let item_entries = entries.entry(record.item_id).or_default();
            match item_entries.iter_mut().find(|entry| {
                entry.location == location
                    && entry.color_id == record.color_id
                    && entry.condition == record.condition
            }) {
                Some(entry) => entry.quantity += record.quantity,
                None => {
                    total_entries += 1;
                    item_entries.push(LocationUsageEntry {
                        location: location.to_string(),
                        quantity: record.quantity,
                        condition: record.condition,
                        color_id: record.color_id,
                    });
                }
            }
        }

        info!(
            records = total_records,
            items = entries.len(),
            "built inventory location index"
        );
        Self {
            entries,
            total_entries,
        }
    }

    /// Usage entries for one item id, in first-seen order.
    pub fn lookup(&self, item_id: &str) -> Option<&[LocationUsageEntry]> {
        self.entries.get(item_id).map(Vec::as_slice)
    }

    /// Number of distinct item ids with at least one located lot.
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> IndexStatistics {
        let mut by_location: HashMap<&str, usize> = HashMap::new();
        for item_entries in self.entries.values() {
            for entry in item_entries {
                *by_location.entry(entry.location.as_str()).or_insert(0) += 1;
            }
        }

        let unique_locations: BTreeSet<&str> = by_location.keys().copied().collect();

        let mut most_used: Vec<(String, usize)> = by_location
            .iter()
            .map(|(location, count)| (location.to_string(), *count))
            .collect();
        // Highest entry count first; lexical on ties so the list is stable.
        most_used.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        most_used.truncate(10);

        IndexStatistics {
            unique_items: self.entries.len(),
            total_entries: self.total_entries,
            unique_locations: unique_locations.len(),
            most_used_locations: most_used,
        }
    }
}

/// Snapshot statistics over a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStatistics {
    pub unique_items: usize,
    pub total_entries: usize,
    pub unique_locations: usize,
    /// Top locations by number of distinct usage entries, at most ten.
    pub most_used_locations: Vec<(String, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(item_id: &str, color_id: &str, quantity: i64, location: &str) -> ExternalInventoryRecord {
        ExternalInventoryRecord {
            item_id: item_id.to_string(),
            color_id: color_id.to_string(),
            quantity,
            condition: Condition::New,
            location_text: location.to_string(),
        }
    }

    #[test]
    fn groups_records_by_item_id() {
        let index = InventoryIndex::build(vec![
            record("3001", "4", 10, "A1"),
            record("3001", "1", 2, "B2"),
            record("3024", "1", 5, "C3"),
        ]);

        assert_eq!(index.item_count(), 2);
        let entries = index.lookup("3001").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].location, "A1");
        assert_eq!(entries[1].location, "B2");
    }

    #[test]
    fn blank_locations_contribute_nothing() {
        let index = InventoryIndex::build(vec![
            record("3001", "4", 10, ""),
            record("3001", "4", 3, "   "),
            record("3024", "1", 5, "C3"),
        ]);

        assert!(index.lookup("3001").is_none());
        assert_eq!(index.item_count(), 1);
    }

    #[test]
    fn location_text_is_trimmed() {
        let index = InventoryIndex::build(vec![record("3001", "4", 10, "  A1 ")]);
        assert_eq!(index.lookup("3001").unwrap()[0].location, "A1");
    }

    #[test]
    fn duplicate_combinations_sum_quantities() {
        let index = InventoryIndex::build(vec![
            record("3001", "4", 10, "A1"),
            record("3001", "4", 7, "A1"),
        ]);

        let entries = index.lookup("3001").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 17);
    }

    #[test]
    fn differing_colors_and_conditions_stay_separate() {
        let mut used = record("3001", "4", 3, "A1");
        used.condition = Condition::Used;
        let index = InventoryIndex::build(vec![
            record("3001", "4", 10, "A1"),
            record("3001", "5", 2, "A1"),
            used,
        ]);

        let entries = index.lookup("3001").unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn lookup_of_unknown_item_is_none() {
        let index = InventoryIndex::build(vec![record("3001", "4", 10, "A1")]);
        assert!(index.lookup("9999").is_none());
    }

    #[test]
    fn statistics_count_entries_and_locations() {
        let index = InventoryIndex::build(vec![
            record("3001", "4", 10, "A1"),
            record("3001", "1", 2, "B2"),
            record("3024", "1", 5, "A1"),
        ]);

        let stats = index.statistics();
        assert_eq!(stats.unique_items, 2);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.unique_locations, 2);
        assert_eq!(stats.most_used_locations[0], ("A1".to_string(), 2));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: building the index never loses or invents quantity for
        /// located records.
        #[test]
        fn build_conserves_located_quantity(
            records in prop::collection::vec(
                ("[0-9]{1,4}", "[0-9]{1,2}", 1i64..100, "[A-Z]?[0-9]{0,2}"),
                0..40,
            )
        ) {
            let records: Vec<ExternalInventoryRecord> = records
                .into_iter()
                .map(|(item_id, color_id, quantity, location)| ExternalInventoryRecord {
                    item_id,
                    color_id,
                    quantity,
                    condition: Condition::New,
                    location_text: location,
                })
                .collect();

            let expected: i64 = records
                .iter()
                .filter(|r| !r.location_text.trim().is_empty())
                .map(|r| r.quantity)
                .sum();

            let index = InventoryIndex::build(records);
            let mut indexed = 0i64;
            for item_id in index.entries.keys() {
                for entry in index.lookup(item_id).unwrap() {
                    indexed += entry.quantity;
                }
            }
            prop_assert_eq!(indexed, expected);
        }
    }
}
