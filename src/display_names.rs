//! Human-readable labels for material names.
//!
//! The table only affects presentation: a name without a label is shown as-is.
//! A default table is compiled into the crate; a replacement can be loaded
//! from a flat JSON file or from a resource pack's `en_us.json` language file.

use crate::error::{PrefabError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const BUNDLED_NAMES: &str = include_str!("../assets/display_names.json");

/// Language file read from resource packs.
const LANG_FILE: &str = "en_us.json";

/// Static name → label table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayNames {
    names: HashMap<String, String>,
}

impl DisplayNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    pub fn bundled() -> Self {
        Self::from_json_str(BUNDLED_NAMES).unwrap_or_else(|e| {
            log::warn!("Bundled display names are unreadable: {}", e);
            Self::new()
        })
    }

    /// Parse a flat `{"name": "Label"}` JSON object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let names: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { names })
    }

    /// Load from a JSON file, a resource pack ZIP, or a resource pack directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.is_dir() {
            return load_pack_directory(path);
        }

        let data = std::fs::read(path)?;
        if data.starts_with(b"PK") {
            Self::from_pack_bytes(&data)
        } else {
            let names: HashMap<String, String> = serde_json::from_slice(&data)?;
            Ok(Self { names })
        }
    }

    /// Load the language files of a resource pack ZIP.
    pub fn from_pack_bytes(data: &[u8]) -> Result<Self> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)?;
        let mut table = Self::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let file_path = file.name().to_string();
            let Some(namespace) = parse_lang_path(&file_path) else {
                continue;
            };

            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            table.merge_lang(namespace, &contents);
        }

        if table.is_empty() {
            return Err(PrefabError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no assets/<namespace>/lang/en_us.json in resource pack",
            )));
        }
        Ok(table)
    }

    /// Label for `name`, or `name` itself when the table has none.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.names.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, label: impl Into<String>) {
        self.names.insert(name.into(), label.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add the `block.<ns>.<id>` entries of a language file as `<ns>:<id>`,
    /// plus bare `<id>` for the `minecraft` namespace. Unparseable files are
    /// skipped with a warning.
    fn merge_lang(&mut self, namespace: &str, contents: &str) {
        let lang: HashMap<String, String> = match serde_json::from_str(contents) {
            Ok(lang) => lang,
            Err(e) => {
                log::warn!("Failed to parse {} language file: {}", namespace, e);
                return;
            }
        };

        for (key, label) in lang {
            let Some(rest) = key.strip_prefix("block.") else {
                continue;
            };
            let Some((ns, id)) = rest.split_once('.') else {
                continue;
            };
            // Nested keys like block.minecraft.bed.occupied aren't block names.
            if id.contains('.') {
                continue;
            }
            if ns == "minecraft" {
                self.names.insert(id.to_string(), label.clone());
            }
            self.names.insert(format!("{}:{}", ns, id), label);
        }
    }
}

fn load_pack_directory(path: &Path) -> Result<DisplayNames> {
    let assets_path = path.join("assets");
    if !assets_path.exists() {
        return Err(PrefabError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no assets directory found",
        )));
    }

    let mut table = DisplayNames::new();
    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let lang_path = namespace_entry.path().join("lang").join(LANG_FILE);
        if lang_path.is_file() {
            let namespace = namespace_entry.file_name().to_string_lossy().to_string();
            let contents = std::fs::read_to_string(&lang_path)?;
            table.merge_lang(&namespace, &contents);
        }
    }
    Ok(table)
}

/// Namespace of an `assets/{namespace}/lang/en_us.json` path.
fn parse_lang_path(file_path: &str) -> Option<&str> {
    let parts: Vec<&str> = file_path.split('/').collect();
    match parts.as_slice() {
        ["assets", namespace, "lang", file] if *file == LANG_FILE => Some(*namespace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LANG: &str = r#"{
        "block.minecraft.stone": "Stone",
        "block.minecraft.bed.occupied": "This bed is occupied",
        "block.mymod.marble": "Marble",
        "item.minecraft.stick": "Stick"
    }"#;

    #[test]
    fn test_bundled_table() {
        let names = DisplayNames::bundled();
        assert!(!names.is_empty());
        assert_eq!(names.resolve("oak_log"), "Oak Log");
        assert_eq!(names.resolve("minecraft:oak_log"), "Oak Log");
    }

    #[test]
    fn test_resolve_falls_back_to_raw_name() {
        let names = DisplayNames::from_json_str(r#"{"stone": "Smooth Stone"}"#).unwrap();
        assert_eq!(names.resolve("stone"), "Smooth Stone");
        assert_eq!(names.resolve("mystery_block"), "mystery_block");
    }

    #[test]
    fn test_parse_lang_path() {
        assert_eq!(parse_lang_path("assets/minecraft/lang/en_us.json"), Some("minecraft"));
        assert_eq!(parse_lang_path("assets/mymod/lang/en_us.json"), Some("mymod"));
        assert_eq!(parse_lang_path("assets/minecraft/lang/de_de.json"), None);
        assert_eq!(parse_lang_path("assets/minecraft/models/block/stone.json"), None);
    }

    #[test]
    fn test_merge_lang_keys() {
        let mut names = DisplayNames::new();
        names.merge_lang("minecraft", LANG);

        assert_eq!(names.resolve("stone"), "Stone");
        assert_eq!(names.resolve("minecraft:stone"), "Stone");
        assert_eq!(names.resolve("mymod:marble"), "Marble");
        assert_eq!(names.resolve("marble"), "marble");
        assert_eq!(names.resolve("stick"), "stick");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_load_flat_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.json");
        std::fs::write(&path, r#"{"dirt": "Soil"}"#).unwrap();

        let names = DisplayNames::load(&path).unwrap();
        assert_eq!(names.resolve("dirt"), "Soil");
    }

    #[test]
    fn test_load_pack_directory() {
        let dir = tempfile::tempdir().unwrap();
        let lang_dir = dir.path().join("assets/minecraft/lang");
        std::fs::create_dir_all(&lang_dir).unwrap();
        std::fs::write(lang_dir.join(LANG_FILE), LANG).unwrap();

        let names = DisplayNames::load(dir.path()).unwrap();
        assert_eq!(names.resolve("minecraft:stone"), "Stone");
    }

    #[test]
    fn test_load_pack_zip() {
        let mut buffer = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("pack.mcmeta", options).unwrap();
            writer.write_all(b"{}").unwrap();
            writer.start_file("assets/minecraft/lang/en_us.json", options).unwrap();
            writer.write_all(LANG.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.zip");
        std::fs::write(&path, buffer.into_inner()).unwrap();

        let names = DisplayNames::load(&path).unwrap();
        assert_eq!(names.resolve("stone"), "Stone");
    }

    #[test]
    fn test_pack_without_lang_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DisplayNames::load(dir.path()).is_err());
    }
}
