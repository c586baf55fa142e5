//! # Prefab Materials
//!
//! A Rust library for tallying the materials used by a voxel prefab and
//! viewing it one layer at a time.
//!
//! ## Overview
//!
//! A prefab is a JSON document with a `blocks` array (and optionally a
//! `fluids` array) of named, optionally positioned entries. This library
//! validates the document, counts how often each name occurs, assigns every
//! name a stable color, and builds a 2D grid for any horizontal layer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use prefab_materials::{parse_prefab, tally_materials};
//!
//! let prefab = parse_prefab(r#"{"blocks":[{"name":"stone"},{"name":"stone"}]}"#)?;
//! let tally = tally_materials(&prefab.blocks, &prefab.fluids);
//!
//! for (name, entry) in tally.sorted() {
//!     println!("{}: {} ({})", name, entry.count, entry.category);
//! }
//! ```
//!
//! ## Sessions
//!
//! [`Session`] keeps the imported blocks, tally, colors and checkbox state
//! together and persists them through a [`KeyValueStore`]:
//!
//! ```ignore
//! use prefab_materials::{DisplayNames, FileStore, Session};
//!
//! let store = FileStore::open(".prefab-materials.json");
//! let mut session = Session::open(store, DisplayNames::bundled());
//!
//! session.import_text(&std::fs::read_to_string("house.json")?)?;
//! session.select_layer(Some(0));
//! let view = session.layer_view();
//! ```

pub mod color;
pub mod display_names;
pub mod error;
pub mod export;
pub mod importer;
pub mod layers;
pub mod session;
pub mod store;
pub mod tally;
pub mod types;

// Re-export main types for convenience
pub use color::{name_hash, ColorMap, HslColor};
pub use display_names::DisplayNames;
pub use error::{PrefabError, Result};
pub use export::{render_png, render_table, render_text, report_json, RenderConfig};
pub use importer::{load_prefab, parse_prefab, parse_prefab_bytes, ImportTicket, Prefab};
pub use layers::{
    GridCell, LayerBounds, LayerGrid, LayerIndex, LayerSummary, LayerView, MAX_GRID_CELLS,
};
pub use session::{ImportOutcome, MaterialRow, Session, Summary};
pub use store::{FileStore, KeyValueStore, MemoryStore, PersistedState};
pub use tally::{is_empty_placeholder, tally_materials, MaterialTally, TallyEntry};
pub use types::{BlockPosition, Category, EntityRecord};

#[cfg(feature = "wasm")]
pub mod wasm;
