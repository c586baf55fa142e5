//! WASM bindings for prefab-materials.
//!
//! The page reads the picked file itself (FileReader is asynchronous), so an
//! import is split in two calls:
//!
//! ```js
//! const ticket = viewer.beginImport();
//! const text = await file.text();
//! viewer.completeImport(ticket, text); // no-op if a newer import started meanwhile
//! ```

use crate::display_names::DisplayNames;
use crate::error::PrefabError;
use crate::export::png::{render_png, RenderConfig};
use crate::importer::ImportTicket;
use crate::session::{ImportOutcome, Session};
use crate::store::LocalStorage;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn js_error(e: PrefabError) -> JsError {
    JsError::new(&e.to_string())
}

/// Serialize a view model and hand it to JS as a plain object.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    let json = serde_json::to_string(value).map_err(|e| js_error(e.into()))?;
    js_sys::JSON::parse(&json).map_err(|_| JsError::new("Failed to build JS value"))
}

/// Viewer state persisted in `localStorage`.
#[wasm_bindgen]
pub struct PrefabViewer {
    session: Session<LocalStorage>,
}

#[wasm_bindgen]
impl PrefabViewer {
    /// Restore the viewer from `localStorage`, optionally with a display-name
    /// table given as a JSON string.
    #[wasm_bindgen(constructor)]
    pub fn new(display_names_json: Option<String>) -> Result<PrefabViewer, JsError> {
        let display_names = match display_names_json {
            Some(json) => DisplayNames::from_json_str(&json).map_err(js_error)?,
            None => DisplayNames::bundled(),
        };
        let store = LocalStorage::open().map_err(js_error)?;
        Ok(PrefabViewer {
            session: Session::open(store, display_names),
        })
    }

    /// Start an import and get its sequence number.
    #[wasm_bindgen(js_name = beginImport)]
    pub fn begin_import(&mut self) -> f64 {
        self.session.begin_import().sequence() as f64
    }

    /// Finish the import started with `ticket`.
    ///
    /// Returns `false` if a newer import was started in the meantime and this
    /// result was dropped. Throws on parse and schema errors; state is cleared
    /// in that case.
    #[wasm_bindgen(js_name = completeImport)]
    pub fn complete_import(&mut self, ticket: f64, text: &str) -> Result<bool, JsError> {
        let ticket = ImportTicket::from_sequence(ticket as u64);
        match self.session.complete_import(ticket, text).map_err(js_error)? {
            ImportOutcome::Applied(_) => Ok(true),
            ImportOutcome::Superseded => Ok(false),
        }
    }

    /// Drop the current block list and tally.
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Message of the last failed import, if any.
    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.session.last_error().map(str::to_string)
    }

    /// Materials table rows, highest count first.
    pub fn materials(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.material_rows())
    }

    /// `{ total_count, unique_count }`.
    pub fn summary(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.summary())
    }

    #[wasm_bindgen(js_name = setChecked)]
    pub fn set_checked(&mut self, name: &str, checked: bool) {
        self.session.set_checked(name, checked);
    }

    #[wasm_bindgen(js_name = isChecked)]
    pub fn is_checked(&self, name: &str) -> bool {
        self.session.is_checked(name)
    }

    /// `[{ y, count }]`, ascending by `y`.
    pub fn layers(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.layer_options())
    }

    /// Select a layer, or pass `undefined` to clear the selection.
    #[wasm_bindgen(js_name = selectLayer)]
    pub fn select_layer(&mut self, y: Option<i32>) {
        self.session.select_layer(y);
    }

    #[wasm_bindgen(getter, js_name = selectedLayer)]
    pub fn selected_layer(&self) -> Option<i32> {
        self.session.selected_layer()
    }

    /// The layer panel: `{ state: "no_layer_selected" | "empty_layer" | "too_large" | "grid", ... }`.
    #[wasm_bindgen(js_name = layerView)]
    pub fn layer_view(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.layer_view())
    }

    /// Global x/z bounds of the prefab.
    pub fn bounds(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.bounds())
    }

    /// CSS color assigned to `name`.
    #[wasm_bindgen(js_name = colorFor)]
    pub fn color_for(&self, name: &str) -> String {
        self.session.colors().color_for(name).to_css()
    }

    /// PNG of the selected layer, or `undefined` when there is no grid.
    #[wasm_bindgen(js_name = layerPng)]
    pub fn layer_png(&self, cell_size: Option<u32>) -> Result<Option<Vec<u8>>, JsError> {
        let view = self.session.layer_view();
        let Some(grid) = view.grid() else {
            return Ok(None);
        };
        let mut config = RenderConfig::default();
        if let Some(size) = cell_size {
            config = config.with_cell_size(size);
        }
        render_png(grid, &config).map(Some).map_err(js_error)
    }
}
