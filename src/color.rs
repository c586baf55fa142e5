//! Deterministic per-name colors for the layer grid.
//!
//! Colors are derived from a 32-bit string hash so the same name always gets
//! the same color, in this crate and in the browser page that shares the
//! persisted `blockColors` map.

use crate::error::{PrefabError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash a name by folding its UTF-16 code units with `hash * 31 + unit`,
/// wrapping on 32-bit signed overflow.
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// A color in HSL space, with saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HslColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl HslColor {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// The color assigned to `name`.
    pub fn for_name(name: &str) -> Self {
        // unsigned_abs keeps i32::MIN well defined.
        let magnitude = name_hash(name).unsigned_abs();
        Self {
            hue: (magnitude % 360) as u16,
            saturation: 65 + (magnitude % 20) as u8,
            lightness: 45 + (magnitude % 15) as u8,
        }
    }

    /// CSS notation, e.g. `hsl(13, 78%, 58%)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Convert to opaque 8-bit RGBA.
    pub fn to_rgba(&self) -> [u8; 4] {
        let h = (self.hue % 360) as f32 / 60.0;
        let s = self.saturation.min(100) as f32 / 100.0;
        let l = self.lightness.min(100) as f32 / 100.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - chroma / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [channel(r), channel(g), channel(b), 255]
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

impl FromStr for HslColor {
    type Err = PrefabError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PrefabError::InvalidColor(s.to_string());

        let inner = s
            .trim()
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let &[hue, saturation, lightness] = parts.as_slice() else {
            return Err(invalid());
        };

        let percent = |part: &str| -> Result<u8> {
            let value = part.strip_suffix('%').ok_or_else(invalid)?;
            value.trim().parse::<u8>().map_err(|_| invalid())
        };

        Ok(Self {
            hue: hue.parse().map_err(|_| invalid())?,
            saturation: percent(saturation)?,
            lightness: percent(lightness)?,
        })
    }
}

impl TryFrom<String> for HslColor {
    type Error = PrefabError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HslColor> for String {
    fn from(color: HslColor) -> Self {
        color.to_string()
    }
}

/// Colors assigned so far, by name.
///
/// Entries are only ever added; a name keeps its first color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorMap {
    colors: IndexMap<String, HslColor>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign colors to names that don't have one yet. Returns how many were added.
    pub fn prime<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut added = 0;
        for name in names {
            if !self.colors.contains_key(name) {
                self.colors.insert(name.to_string(), HslColor::for_name(name));
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, name: &str) -> Option<HslColor> {
        self.colors.get(name).copied()
    }

    /// The stored color for `name`, or its hashed color if none is stored.
    pub fn color_for(&self, name: &str) -> HslColor {
        self.get(name).unwrap_or_else(|| HslColor::for_name(name))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
