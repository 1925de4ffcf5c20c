//! The five-rule location selection procedure.
//!
//! Rules are evaluated in strict order; the first that applies wins:
//!
//! 1. a location holding only the target color,
//! 2. the sole known location for the item,
//! 3. among several single-color locations: best zone, then lowest stock,
//! 4. when dedicated locations exist for other colors: best-zone,
//!    highest-stock mixed location,
//! 5. highest aggregate quantity per location, zone first.
//!
//! Ties inside every rule fall back to lexical order of the location label,
//! so the whole procedure is deterministic.

use std::collections::BTreeSet;

use tracing::debug;

use brickplace_inventory::LocationUsageEntry;

/// Warehouse-zone preference for a location label: zone `R` ranks highest,
/// then zone `S`, then everything else (including an empty label). The
/// first character is matched case-insensitively.
pub fn zone_priority(location: &str) -> u8 {
    match location.chars().next() {
        Some(c) if c.eq_ignore_ascii_case(&'r') => 0,
        Some(c) if c.eq_ignore_ascii_case(&'s') => 1,
        _ => 2,
    }
}

/// Per-location view of an item's usage entries.
struct LocationStats {
    location: String,
    colors: BTreeSet<String>,
    total_quantity: i64,
}

impl LocationStats {
    fn is_single_color(&self) -> bool {
        self.colors.len() == 1
    }
}

/// Pick the best storage location for `item_id` in `color_id`, given the
/// item's known usage entries. Entries with empty locations are ignored;
/// returns `None` when nothing usable remains.
pub fn select_location(
    item_id: &str,
    color_id: &str,
    entries: &[LocationUsageEntry],
) -> Option<String> {
    let stats = analyze(entries);
    if stats.is_empty() {
        return None;
    }

    // Rule 1: a location dedicated to exactly the target color.
    let mut dedicated: Vec<&LocationStats> = stats
        .iter()
        .filter(|s| s.is_single_color() && s.colors.contains(color_id))
        .collect();
    if !dedicated.is_empty() {
        dedicated.sort_by(|a, b| a.location.cmp(&b.location));
        let location = &dedicated[0].location;
        debug!(item_id, color_id, %location, "dedicated color location");
        return Some(location.clone());
    }

    // Rule 2: only one location is known for this item at all.
    if stats.len() == 1 {
        let location = &stats[0].location;
        debug!(item_id, color_id, %location, "sole known location");
        return Some(location.clone());
    }

    let mut pure: Vec<&LocationStats> = stats.iter().filter(|s| s.is_single_color()).collect();
    let mut mixed: Vec<&LocationStats> = stats.iter().filter(|s| !s.is_single_color()).collect();

    // Rule 3: several single-color locations (none of the target color).
    // Prefer zone, then the *least* stocked, to avoid crowding a location
    // already holding a lot of another color.
    if pure.len() >= 2 {
        pure.sort_by(|a, b| {
            zone_priority(&a.location)
                .cmp(&zone_priority(&b.location))
                .then(a.total_quantity.cmp(&b.total_quantity))
                .then_with(|| a.location.cmp(&b.location))
        });
        let location = &pure[0].location;
        debug!(item_id, color_id, %location, "least-stocked single-color location");
        return Some(location.clone());
    }

    // Rule 4: dedicated locations exist for other colors; batch into the
    // best-zone, highest-stocked mixed location instead.
    if !pure.is_empty() && !mixed.is_empty() {
        mixed.sort_by(|a, b| {
            zone_priority(&a.location)
                .cmp(&zone_priority(&b.location))
                .then(b.total_quantity.cmp(&a.total_quantity))
                .then_with(|| a.location.cmp(&b.location))
        });
        let location = &mixed[0].location;
        debug!(item_id, color_id, %location, "mixed location fallback");
        return Some(location.clone());
    }

    // Rule 5: most-used location overall, zone first.
    let mut all: Vec<&LocationStats> = stats.iter().collect();
    all.sort_by(|a, b| {
        zone_priority(&a.location)
            .cmp(&zone_priority(&b.location))
            .then(b.total_quantity.cmp(&a.total_quantity))
            .then_with(|| a.location.cmp(&b.location))
    });
    let location = &all[0].location;
    debug!(item_id, color_id, %location, "frequency fallback");
    Some(location.clone())
}

/// Aggregate entries per location, keeping first-seen location order.
fn analyze(entries: &[LocationUsageEntry]) -> Vec<LocationStats> {
    let mut stats: Vec<LocationStats> = Vec::new();
    for entry in entries {
        if entry.location.is_empty() {
            continue;
        }
        match stats.iter_mut().find(|s| s.location == entry.location) {
            Some(existing) => {
                existing.colors.insert(entry.color_id.clone());
                existing.total_quantity += entry.quantity;
            }
            None => {
                stats.push(LocationStats {
                    location: entry.location.clone(),
                    colors: BTreeSet::from([entry.color_id.clone()]),
                    total_quantity: entry.quantity,
                });
            }
        }
    }
    stats
}
