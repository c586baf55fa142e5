//! Report and grid export formats.
//!
//! Text and JSON renderings of the materials table, plus text and PNG
//! renderings of a layer grid.

pub mod grid;
pub mod json;
pub mod png;
pub mod table;

pub use grid::render_text;
pub use json::{report_json, MaterialReport};
pub use png::{render_png, RenderConfig};
pub use table::render_table;
