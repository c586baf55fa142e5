//! Prefab document import and validation.
//!
//! A prefab is a JSON object with a required `blocks` array and an optional
//! `fluids` array of the same element shape:
//!
//! ```json
//! {
//!   "blocks": [ { "name": "minecraft:stone", "x": 0, "y": 0, "z": 0 } ],
//!   "fluids": [ { "name": "minecraft:water", "x": 0, "y": 1, "z": 0 } ]
//! }
//! ```

use crate::error::{PrefabError, Result};
use crate::types::EntityRecord;
use serde_json::Value;
use std::path::Path;

/// A validated prefab document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prefab {
    pub blocks: Vec<EntityRecord>,
    pub fluids: Vec<EntityRecord>,
}

impl Prefab {
    /// Every distinct non-empty name across blocks and fluids, in first-seen order.
    pub fn names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.blocks
            .iter()
            .chain(self.fluids.iter())
            .filter_map(EntityRecord::name)
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Parse prefab text.
pub fn parse_prefab(text: &str) -> Result<Prefab> {
    let document: Value = serde_json::from_str(text)?;
    prefab_from_value(document)
}

/// Parse prefab bytes (the raw contents of a picked file).
pub fn parse_prefab_bytes(data: &[u8]) -> Result<Prefab> {
    let document: Value = serde_json::from_slice(data)?;
    prefab_from_value(document)
}

/// Read and parse a prefab file from disk.
pub fn load_prefab<P: AsRef<Path>>(path: P) -> Result<Prefab> {
    let data = std::fs::read(path)?;
    parse_prefab_bytes(&data)
}

fn prefab_from_value(document: Value) -> Result<Prefab> {
    let Value::Object(mut root) = document else {
        return Err(PrefabError::MissingBlocks);
    };

    let blocks = match root.remove("blocks") {
        Some(Value::Array(items)) => records_from_array(items),
        _ => return Err(PrefabError::MissingBlocks),
    };

    // A `fluids` field of any other type is ignored rather than rejected.
    let fluids = match root.remove("fluids") {
        Some(Value::Array(items)) => records_from_array(items),
        _ => Vec::new(),
    };

    log::debug!(
        "Parsed prefab with {} blocks and {} fluids",
        blocks.len(),
        fluids.len()
    );

    Ok(Prefab { blocks, fluids })
}

fn records_from_array(items: Vec<Value>) -> Vec<EntityRecord> {
    let total = items.len();
    let records: Vec<EntityRecord> = items
        .into_iter()
        .filter_map(EntityRecord::from_json)
        .collect();
    if records.len() != total {
        log::debug!("Skipped {} non-object entries", total - records.len());
    }
    records
}

/// Sequence number of one import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportTicket(u64);

impl ImportTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }

    pub fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }
}

/// Hands out increasing tickets and tells whether a finished attempt is
/// still the latest one.
///
/// An attempt that completes after a newer one was started is stale and its
/// result must be dropped.
#[derive(Debug, Default)]
pub struct ImportSequencer {
    latest: u64,
}

impl ImportSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new import attempt.
    pub fn begin(&mut self) -> ImportTicket {
        self.latest += 1;
        ImportTicket(self.latest)
    }

    /// Whether `ticket` belongs to the most recently started attempt.
    pub fn is_current(&self, ticket: ImportTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks_only() {
        let prefab = parse_prefab(
            r#"{"blocks":[{"name":"stone"},{"name":"dirt"},{"name":"stone"},{"name":"oak_log"}]}"#,
        )
        .unwrap();
        assert_eq!(prefab.blocks.len(), 4);
        assert!(prefab.fluids.is_empty());
        assert_eq!(prefab.names(), vec!["stone", "dirt", "oak_log"]);
    }

    #[test]
    fn test_parse_with_fluids() {
        let prefab = parse_prefab(
            r#"{"blocks":[{"name":"water","x":0,"y":1,"z":0}],"fluids":[{"name":"water","x":0,"y":1,"z":1}]}"#,
        )
        .unwrap();
        assert_eq!(prefab.blocks.len(), 1);
        assert_eq!(prefab.fluids.len(), 1);
        assert_eq!(prefab.fluids[0].z, Some(1));
    }

    #[test]
    fn test_missing_blocks_is_schema_error() {
        let err = parse_prefab(r#"{"wrongKey":[]}"#).unwrap_err();
        assert!(matches!(err, PrefabError::MissingBlocks));
        assert_eq!(err.to_string(), "JSON must contain a blocks array");
    }

    #[test]
    fn test_blocks_not_array_is_schema_error() {
        assert!(matches!(
            parse_prefab(r#"{"blocks":{"name":"stone"}}"#),
            Err(PrefabError::MissingBlocks)
        ));
        assert!(matches!(parse_prefab("[1, 2]"), Err(PrefabError::MissingBlocks)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_prefab("{").unwrap_err();
        assert!(matches!(err, PrefabError::Parse(_)));
        assert!(err.to_string().starts_with("JSON parse error: "));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        assert!(matches!(
            parse_prefab_bytes(&[b'{', 0xff, b'}']),
            Err(PrefabError::Parse(_))
        ));
    }

    #[test]
    fn test_fluids_of_wrong_type_are_ignored() {
        let prefab = parse_prefab(r#"{"blocks":[],"fluids":"none"}"#).unwrap();
        assert!(prefab.fluids.is_empty());
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let prefab = parse_prefab(r#"{"blocks":[{"name":"stone"}, 3, "dirt", null]}"#).unwrap();
        assert_eq!(prefab.blocks.len(), 1);
    }

    #[test]
    fn test_load_prefab_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("house.json");
        std::fs::write(&path, r#"{"blocks":[{"name":"stone","x":0,"y":0,"z":0}]}"#).unwrap();

        let prefab = load_prefab(&path).unwrap();
        assert_eq!(prefab.blocks[0].name(), Some("stone"));

        assert!(matches!(
            load_prefab(dir.path().join("missing.json")),
            Err(PrefabError::Io(_))
        ));
    }

    #[test]
    fn test_sequencer_discards_superseded() {
        let mut sequencer = ImportSequencer::new();
        let first = sequencer.begin();
        let second = sequencer.begin();

        assert!(first < second);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }
}
