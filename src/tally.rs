//! Material usage tally.

use crate::types::{Category, EntityRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Count and category for one material name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub count: u64,
    pub category: Category,
}

/// Frequency table from material name to [`TallyEntry`], in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialTally {
    entries: IndexMap<String, TallyEntry>,
}

/// Whether `name` is a placeholder that must not be counted.
pub fn is_empty_placeholder(name: &str) -> bool {
    name.to_lowercase().contains("empty")
}

/// Count every named record in `blocks`, then in `fluids`.
///
/// A name keeps the category of the list it was first seen in, so a name
/// present in both lists is tallied as a block.
pub fn tally_materials(blocks: &[EntityRecord], fluids: &[EntityRecord]) -> MaterialTally {
    let mut tally = MaterialTally::new();
    tally.add_records(blocks, Category::Block);
    tally.add_records(fluids, Category::Fluid);
    tally
}

impl MaterialTally {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_records(&mut self, records: &[EntityRecord], category: Category) {
        for name in records.iter().filter_map(EntityRecord::name) {
            if is_empty_placeholder(name) {
                continue;
            }
            self.entries
                .entry(name.to_string())
                .or_insert(TallyEntry { count: 0, category })
                .count += 1;
        }
    }

    pub fn get(&self, name: &str) -> Option<&TallyEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TallyEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct names.
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts.
    pub fn total_count(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Entries by count, highest first. Equal counts keep first-seen order.
    pub fn sorted(&self) -> Vec<(&str, &TallyEntry)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::parse_prefab;

    fn tally_of(json: &str) -> MaterialTally {
        let prefab = parse_prefab(json).unwrap();
        tally_materials(&prefab.blocks, &prefab.fluids)
    }

    #[test]
    fn test_basic_tally() {
        let tally = tally_of(
            r#"{"blocks":[{"name":"stone"},{"name":"dirt"},{"name":"stone"},{"name":"oak_log"}]}"#,
        );

        assert_eq!(tally.get("stone"), Some(&TallyEntry { count: 2, category: Category::Block }));
        assert_eq!(tally.get("dirt").map(|e| e.count), Some(1));
        assert_eq!(tally.get("oak_log").map(|e| e.count), Some(1));
        assert_eq!(tally.total_count(), 4);
        assert_eq!(tally.unique_count(), 3);

        let sorted = tally.sorted();
        assert_eq!(sorted[0].0, "stone");
        assert_eq!(sorted[1].0, "dirt");
        assert_eq!(sorted[2].0, "oak_log");
    }

    #[test]
    fn test_empty_placeholders_skipped() {
        assert!(tally_of(r#"{"blocks":[{"name":"air_empty"}]}"#).is_empty());
        assert!(tally_of(r#"{"blocks":[{"name":"EMPTY_SLOT"},{"name":"isEmptyCell"}]}"#).is_empty());
    }

    #[test]
    fn test_records_without_name_skipped() {
        let tally = tally_of(r#"{"blocks":[{"x":0},{"name":""},{"name":7},{"name":"stone"}]}"#);
        assert_eq!(tally.unique_count(), 1);
        assert_eq!(tally.total_count(), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let tally = tally_of(r#"{"blocks":[{"name":"Stone"},{"name":"stone"}]}"#);
        assert_eq!(tally.unique_count(), 2);
    }

    #[test]
    fn test_name_in_both_lists_keeps_block_category() {
        // Blocks are processed first, so a shared name is recorded as a block.
        let tally = tally_of(
            r#"{"blocks":[{"name":"water","x":0,"y":1,"z":0}],"fluids":[{"name":"water","x":0,"y":1,"z":1}]}"#,
        );
        assert_eq!(tally.unique_count(), 1);
        assert_eq!(tally.get("water"), Some(&TallyEntry { count: 2, category: Category::Block }));
    }

    #[test]
    fn test_fluid_only_names_are_fluids() {
        let tally = tally_of(r#"{"blocks":[],"fluids":[{"name":"lava"},{"name":"lava"}]}"#);
        assert_eq!(tally.get("lava"), Some(&TallyEntry { count: 2, category: Category::Fluid }));
    }

    #[test]
    fn test_total_matches_countable_records() {
        let json = r#"{"blocks":[{"name":"a"},{"name":"b_empty"},{"name":"a"},{},{"name":"c"}],
                       "fluids":[{"name":"water"},{"name":"Empty"},{"name":"a"}]}"#;
        let prefab = parse_prefab(json).unwrap();
        let tally = tally_materials(&prefab.blocks, &prefab.fluids);

        let countable = prefab
            .blocks
            .iter()
            .chain(prefab.fluids.iter())
            .filter_map(EntityRecord::name)
            .filter(|n| !is_empty_placeholder(n))
            .count() as u64;
        assert_eq!(tally.total_count(), countable);

        for (name, _) in tally.iter() {
            assert!(prefab.names().contains(&name));
        }
    }

    #[test]
    fn test_retally_is_identical() {
        let json = r#"{"blocks":[{"name":"b"},{"name":"a"},{"name":"b"}],"fluids":[{"name":"w"}]}"#;
        assert_eq!(tally_of(json), tally_of(json));
    }

    #[test]
    fn test_sorted_is_non_increasing() {
        let tally = tally_of(
            r#"{"blocks":[{"name":"a"},{"name":"b"},{"name":"b"},{"name":"c"},{"name":"c"},{"name":"c"},{"name":"d"}]}"#,
        );
        let counts: Vec<u64> = tally.sorted().iter().map(|(_, e)| e.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(counts, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_serializes_as_name_map() {
        let tally = tally_of(r#"{"blocks":[{"name":"stone"}],"fluids":[{"name":"water"}]}"#);
        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stone": {"count": 1, "category": "block"},
                "water": {"count": 1, "category": "fluid"}
            })
        );
        let back: MaterialTally = serde_json::from_value(json).unwrap();
        assert_eq!(back, tally);
    }
}
