//! The assignment engine.

use tracing::info;

use brickplace_assign::select_location;
use brickplace_core::{CoreError, CoreResult};
use brickplace_document::Document;
use brickplace_inventory::{ExternalInventoryRecord, InventoryIndex};

use crate::report::{Assignment, AssignmentReport, UnmatchedItem};

/// Whether a pass only reports proposed assignments or also writes them
/// into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    Preview,
    Apply,
}

/// Owns the current inventory index and runs assignment passes against it.
///
/// The index is replaced wholesale on re-fetch, never updated
/// incrementally: the heuristic needs the complete usage set for an item id
/// to decide correctly.
#[derive(Debug, Default)]
pub struct AssignmentEngine {
    index: Option<InventoryIndex>,
}

impl AssignmentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an already-built index.
    pub fn set_index(&mut self, index: InventoryIndex) {
        self.index = Some(index);
    }

    /// Build and install an index from a complete provider record sequence.
    pub fn build_index(&mut self, records: impl IntoIterator<Item = ExternalInventoryRecord>) {
        self.index = Some(InventoryIndex::build(records));
    }

    pub fn index(&self) -> Option<&InventoryIndex> {
        self.index.as_ref()
    }

    /// Run one pass over every item in `document` that lacks a location.
    ///
    /// In [`ProcessMode::Apply`] a match is written back through
    /// [`Document::set_location`]; the report entries are identical in both
    /// modes. Fails with [`CoreError::IndexNotBuilt`] when no index has
    /// been supplied yet.
    pub fn process(
        &self,
        document: &mut Document,
        mode: ProcessMode,
    ) -> CoreResult<AssignmentReport> {
        let index = self.index.as_ref().ok_or(CoreError::IndexNotBuilt)?;

        let candidates: Vec<usize> = document
            .items_without_location()
            .map(|(position, _)| position)
            .collect();

        let mut assignments = Vec::new();
        let mut unmatched = Vec::new();

        for item_index in candidates {
            let item = &document.items()[item_index];
            let found = index
                .lookup(&item.item_id)
                .and_then(|entries| select_location(&item.item_id, &item.color_id, entries));

            match found {
                Some(location) => {
                    assignments.push(Assignment {
                        item_id: item.item_id.clone(),
                        item_name: item.item_name.clone(),
                        color_name: item.color_name.clone(),
                        condition: item.condition,
                        quantity: item.quantity,
                        assigned_location: location.clone(),
                    });
                    if mode == ProcessMode::Apply {
                        document.set_location(item_index, &location)?;
                    }
                }
                None => unmatched.push(UnmatchedItem {
                    item_id: item.item_id.clone(),
                    item_name: item.item_name.clone(),
                    color_name: item.color_name.clone(),
                    condition: item.condition,
                    quantity: item.quantity,
                }),
            }
        }

        let report = AssignmentReport::new(assignments, unmatched);
        info!(
            total = report.total_processed,
            assigned = report.assigned_count,
            unmatched = report.unmatched_count,
            success_rate = report.success_rate,
            "assignment pass finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickplace_core::Condition;

    const SAMPLE: &str = r#"<BrickStoreXML>
  <Inventory>
    <Item>
      <ItemID>3001</ItemID>
      <ItemTypeID>P</ItemTypeID>
      <ColorID>1</ColorID>
      <ColorName>White</ColorName>
      <ItemName>Brick 2 x 4</ItemName>
      <Qty>4</Qty>
      <Condition>N</Condition>
      <Remarks></Remarks>
    </Item>
    <Item>
      <ItemID>3024</ItemID>
      <ColorID>1</ColorID>
      <ColorName>White</ColorName>
      <ItemName>Plate 1 x 1</ItemName>
      <Qty>25</Qty>
    </Item>
    <Item>
      <ItemID>9999</ItemID>
      <ColorID>5</ColorID>
      <ColorName>Green</ColorName>
      <ItemName>Mystery</ItemName>
      <Qty>1</Qty>
    </Item>
    <Item>
      <ItemID>973</ItemID>
      <ColorID>2</ColorID>
      <ItemName>Torso Plain</ItemName>
      <Remarks>A1-B2</Remarks>
    </Item>
  </Inventory>
</BrickStoreXML>"#;

    fn record(item_id: &str, color_id: &str, quantity: i64, location: &str) -> ExternalInventoryRecord {
        ExternalInventoryRecord {
            item_id: item_id.to_string(),
            color_id: color_id.to_string(),
            quantity,
            condition: Condition::New,
            location_text: location.to_string(),
        }
    }

    fn engine_with_store_stock() -> AssignmentEngine {
        let mut engine = AssignmentEngine::new();
        engine.build_index(vec![
            // 3001: two pure color-4 locations; for a color-1 target the
            // least-stocked one (B2) should win.
            record("3001", "4", 10, "A1"),
            record("3001", "4", 2, "B2"),
            // 3024: one mixed location.
            record("3024", "1", 5, "C3"),
            record("3024", "2", 3, "C3"),
        ]);
        engine
    }

    #[test]
    fn process_without_index_fails() {
        let engine = AssignmentEngine::new();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();
        assert!(matches!(
            engine.process(&mut doc, ProcessMode::Preview),
            Err(CoreError::IndexNotBuilt)
        ));
    }

    #[test]
    fn preview_reports_without_mutating_the_document() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();
        let before = doc.to_xml_string().unwrap();

        let report = engine.process(&mut doc, ProcessMode::Preview).unwrap();

        assert_eq!(report.total_processed, 3);
        assert_eq!(report.assigned_count, 2);
        assert_eq!(report.unmatched_count, 1);
        assert_eq!(doc.to_xml_string().unwrap(), before);
    }

    #[test]
    fn apply_writes_locations_into_the_document() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();

        let report = engine.process(&mut doc, ProcessMode::Apply).unwrap();
        assert_eq!(report.assigned_count, 2);

        assert_eq!(doc.items()[0].location, "B2");
        assert_eq!(doc.items()[1].location, "C3");
        assert_eq!(doc.items()[2].location, "");

        // The write-back survives a save/load cycle.
        let reloaded = Document::from_xml_str(&doc.to_xml_string().unwrap()).unwrap();
        assert_eq!(reloaded.items()[0].location, "B2");
        assert_eq!(reloaded.items()[1].location, "C3");
    }

    #[test]
    fn report_entries_match_between_preview_and_apply() {
        let engine = engine_with_store_stock();

        let mut preview_doc = Document::from_xml_str(SAMPLE).unwrap();
        let preview = engine.process(&mut preview_doc, ProcessMode::Preview).unwrap();

        let mut apply_doc = Document::from_xml_str(SAMPLE).unwrap();
        let applied = engine.process(&mut apply_doc, ProcessMode::Apply).unwrap();

        assert_eq!(preview.assignments, applied.assignments);
        assert_eq!(preview.unmatched, applied.unmatched);
    }

    #[test]
    fn preview_is_idempotent() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();

        let first = engine.process(&mut doc, ProcessMode::Preview).unwrap();
        let second = engine.process(&mut doc, ProcessMode::Preview).unwrap();

        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.unmatched, second.unmatched);
        assert_eq!(first.success_rate, second.success_rate);
    }

    #[test]
    fn items_absent_from_the_index_are_unmatched() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();

        let report = engine.process(&mut doc, ProcessMode::Preview).unwrap();
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].item_id, "9999");
        assert_eq!(report.unmatched[0].item_name, "Mystery");
    }

    #[test]
    fn already_located_items_are_not_touched() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();

        let report = engine.process(&mut doc, ProcessMode::Apply).unwrap();
        assert!(report.assignments.iter().all(|a| a.item_id != "973"));
        assert_eq!(doc.items()[3].location, "A1-B2");
    }

    #[test]
    fn success_rate_is_a_rounded_percentage() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();

        let report = engine.process(&mut doc, ProcessMode::Preview).unwrap();
        // 2 of 3 candidates.
        assert_eq!(report.success_rate, 66.7);
    }

    #[test]
    fn success_rate_is_zero_for_empty_candidate_set() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(
            "<BrickStoreXML><Inventory><Item><ItemID>973</ItemID><Remarks>A1</Remarks></Item></Inventory></BrickStoreXML>",
        )
        .unwrap();

        let report = engine.process(&mut doc, ProcessMode::Preview).unwrap();
        assert_eq!(report.total_processed, 0);
        assert_eq!(report.success_rate, 0.0);
    }

    #[test]
    fn report_serializes_to_json() {
        let engine = engine_with_store_stock();
        let mut doc = Document::from_xml_str(SAMPLE).unwrap();
        let report = engine.process(&mut doc, ProcessMode::Preview).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["assigned_count"], 2);
        assert_eq!(value["assignments"][0]["item_id"], "3001");
    }
}
