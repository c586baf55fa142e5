//! Shared types used throughout the library.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A block position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Whether a tallied name came from the `blocks` or the `fluids` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Block,
    Fluid,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Block => "block",
            Category::Fluid => "fluid",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One imported block or fluid occurrence.
///
/// Only `name`, the coordinates and `rotation` are interpreted. Every other
/// field, and any known field whose value has the wrong type, is kept in
/// `extra` so the record serializes back to what was imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: i32, y: i32, z: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.z = Some(z);
        self
    }

    pub fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Build a record from one element of a `blocks`/`fluids` array.
    ///
    /// Returns `None` for elements that are not JSON objects.
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Object(mut extra) = value else {
            return None;
        };

        let name = match extra.remove("name") {
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                extra.insert("name".to_string(), other);
                None
            }
            None => None,
        };

        let x = take_i32(&mut extra, "x");
        let y = take_i32(&mut extra, "y");
        let z = take_i32(&mut extra, "z");
        let rotation = take_i32(&mut extra, "rotation");

        Some(Self {
            name,
            x,
            y,
            z,
            rotation,
            extra,
        })
    }

    /// The record's name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The record's position, if all three coordinates are present.
    pub fn position(&self) -> Option<BlockPosition> {
        Some(BlockPosition::new(self.x?, self.y?, self.z?))
    }
}

impl<'de> Deserialize<'de> for EntityRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        EntityRecord::from_json(value)
            .ok_or_else(|| de::Error::custom("entity record must be a JSON object"))
    }
}

/// Remove `key` from `map` if it holds an integer that fits in `i32`.
/// Integral floats like `1.0` count. Anything else stays in the map untouched.
fn take_i32(map: &mut Map<String, Value>, key: &str) -> Option<i32> {
    let parsed = map.get(key).and_then(integral_i32)?;
    map.remove(key);
    Some(parsed)
}

fn integral_i32(value: &Value) -> Option<i32> {
    if let Some(v) = value.as_i64() {
        return i32::try_from(v).ok();
    }
    let v = value.as_f64()?;
    let in_range = v >= i32::MIN as f64 && v <= i32::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_typed_fields() {
        let record = EntityRecord::from_json(json!({
            "name": "minecraft:stone",
            "x": 1, "y": -2, "z": 3,
            "rotation": 90,
            "properties": {"facing": "north"}
        }))
        .unwrap();

        assert_eq!(record.name(), Some("minecraft:stone"));
        assert_eq!(record.position(), Some(BlockPosition::new(1, -2, 3)));
        assert_eq!(record.rotation, Some(90));
        assert_eq!(record.extra.len(), 1);
        assert!(record.extra.contains_key("properties"));
    }

    #[test]
    fn test_from_json_wrong_types_kept_as_extra() {
        let record = EntityRecord::from_json(json!({
            "name": 5,
            "x": "left",
            "y": 4_000_000_000i64,
            "z": 1.5
        }))
        .unwrap();

        assert_eq!(record.name(), None);
        assert_eq!(record.position(), None);
        assert_eq!(record.extra.get("name"), Some(&json!(5)));
        assert_eq!(record.extra.get("x"), Some(&json!("left")));
        assert_eq!(record.extra.len(), 4);
    }

    #[test]
    fn test_from_json_accepts_integral_floats() {
        let record = EntityRecord::from_json(json!({
            "name": "stone",
            "x": 1.0,
            "y": -2.0,
            "z": 0.0,
            "rotation": 90.0
        }))
        .unwrap();

        assert_eq!(record.position(), Some(BlockPosition::new(1, -2, 0)));
        assert_eq!(record.rotation, Some(90));
        assert!(record.extra.is_empty());

        let out_of_range = EntityRecord::from_json(json!({"x": 3e9, "y": f64::MIN})).unwrap();
        assert_eq!(out_of_range.x, None);
        assert_eq!(out_of_range.y, None);
        assert_eq!(out_of_range.extra.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(EntityRecord::from_json(json!("stone")).is_none());
        assert!(EntityRecord::from_json(json!([1, 2])).is_none());
        assert!(EntityRecord::from_json(Value::Null).is_none());
    }

    #[test]
    fn test_empty_name_is_absent() {
        let record = EntityRecord::new("");
        assert_eq!(record.name(), None);
    }

    #[test]
    fn test_serde_preserves_extra_fields() {
        let original = json!({"name": "oak_log", "x": 0, "y": 1, "z": 2, "axis": "y"});
        let record: EntityRecord = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), original);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Fluid).unwrap(), "\"fluid\"");
        assert_eq!(Category::Block.to_string(), "block");
    }
}
