//! The single owner of viewer state.
//!
//! Every mutating call recomputes the derived state it affects and writes the
//! changed keys to the store right away. Nothing is recomputed lazily.

use crate::color::ColorMap;
use crate::display_names::DisplayNames;
use crate::error::Result;
use crate::importer::{parse_prefab, parse_prefab_bytes, ImportSequencer, ImportTicket, Prefab};
use crate::layers::{LayerBounds, LayerIndex, LayerSummary, LayerView};
use crate::store::{
    write_value, KeyValueStore, PersistedState, BLOCKS_KEY, BLOCK_COLORS_KEY, CHECKED_ITEMS_KEY,
    MATERIALS_KEY,
};
use crate::tally::{tally_materials, MaterialTally};
use crate::types::{Category, EntityRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the materials table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub name: String,
    pub display_name: String,
    pub count: u64,
    pub category: Category,
    pub checked: bool,
}

/// Totals shown above the materials table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_count: u64,
    pub unique_count: usize,
}

/// Result of finishing an import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The prefab replaced the current state.
    Applied(Summary),
    /// A newer import was started first; this one was dropped.
    Superseded,
}

/// Viewer state backed by a key-value store.
pub struct Session<S: KeyValueStore> {
    store: S,
    display_names: DisplayNames,
    blocks: Vec<EntityRecord>,
    materials: MaterialTally,
    colors: ColorMap,
    checked_items: BTreeMap<String, bool>,
    selected_layer: Option<i32>,
    bounds: LayerBounds,
    layer_index: LayerIndex,
    last_error: Option<String>,
    sequencer: ImportSequencer,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore state from `store`. Unreadable keys start out empty.
    pub fn open(store: S, display_names: DisplayNames) -> Self {
        let PersistedState {
            materials,
            checked_items,
            blocks,
            block_colors,
        } = PersistedState::load(&store);

        let mut session = Self {
            store,
            display_names,
            blocks,
            materials,
            colors: block_colors,
            checked_items,
            selected_layer: None,
            bounds: LayerBounds::default(),
            layer_index: LayerIndex::default(),
            last_error: None,
            sequencer: ImportSequencer::new(),
        };

        // The block list and color map are written separately, so a partial
        // write can leave names without colors.
        let added = session
            .colors
            .prime(session.blocks.iter().filter_map(EntityRecord::name));
        if added > 0 {
            log::debug!("Assigned {} missing colors on startup", added);
            write_value(&mut session.store, BLOCK_COLORS_KEY, &session.colors);
        }

        session.refresh_layers();
        log::debug!(
            "Restored {} blocks and {} materials",
            session.blocks.len(),
            session.materials.unique_count()
        );
        session
    }

    /// Start an import attempt. Pass the ticket to [`Session::complete_import`]
    /// once the file contents are available.
    pub fn begin_import(&mut self) -> ImportTicket {
        self.sequencer.begin()
    }

    /// Finish an import attempt with the file's text.
    ///
    /// A ticket that is no longer the latest is dropped without touching
    /// state. Otherwise the prefab replaces the current state, or, on error,
    /// the block list and tally are cleared and the error is returned.
    pub fn complete_import(&mut self, ticket: ImportTicket, text: &str) -> Result<ImportOutcome> {
        if !self.sequencer.is_current(ticket) {
            log::debug!("Dropping superseded import #{}", ticket.sequence());
            return Ok(ImportOutcome::Superseded);
        }
        self.finish_import(parse_prefab(text))
    }

    /// Import text in one step.
    ///
    /// This takes a new ticket, so an import still pending from
    /// [`Session::begin_import`] is superseded and will be dropped.
    pub fn import_text(&mut self, text: &str) -> Result<Summary> {
        self.begin_import();
        self.finish_import(parse_prefab(text)).map(|_| self.summary())
    }

    /// Import raw file bytes in one step. Like [`Session::import_text`], this
    /// supersedes any pending ticket.
    pub fn import_bytes(&mut self, data: &[u8]) -> Result<Summary> {
        self.begin_import();
        self.finish_import(parse_prefab_bytes(data)).map(|_| self.summary())
    }

    fn finish_import(&mut self, parsed: Result<Prefab>) -> Result<ImportOutcome> {
        match parsed {
            Ok(prefab) => {
                self.apply_prefab(prefab);
                Ok(ImportOutcome::Applied(self.summary()))
            }
            Err(e) => {
                log::debug!("Import failed: {}", e);
                self.clear();
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn apply_prefab(&mut self, prefab: Prefab) {
        self.materials = tally_materials(&prefab.blocks, &prefab.fluids);
        let added = self.colors.prime(prefab.names());
        self.blocks = prefab.blocks;
        self.last_error = None;
        self.refresh_layers();

        log::debug!(
            "Imported {} blocks, {} materials, {} new colors",
            self.blocks.len(),
            self.materials.unique_count(),
            added
        );

        write_value(&mut self.store, BLOCKS_KEY, &self.blocks);
        write_value(&mut self.store, MATERIALS_KEY, &self.materials);
        if added > 0 {
            write_value(&mut self.store, BLOCK_COLORS_KEY, &self.colors);
        }
    }

    /// Drop the block list and tally. Colors and checked items are kept.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.materials = MaterialTally::new();
        self.last_error = None;
        self.refresh_layers();
        write_value(&mut self.store, BLOCKS_KEY, &self.blocks);
        write_value(&mut self.store, MATERIALS_KEY, &self.materials);
    }

    fn refresh_layers(&mut self) {
        self.bounds = LayerBounds::from_records(&self.blocks);
        self.layer_index = LayerIndex::build(&self.blocks);
        if let Some(y) = self.selected_layer {
            if !self.layer_index.contains(y) {
                self.selected_layer = None;
            }
        }
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) {
        self.checked_items.insert(name.to_string(), checked);
        write_value(&mut self.store, CHECKED_ITEMS_KEY, &self.checked_items);
    }

    /// Flip the checkbox for `name` and return its new value.
    pub fn toggle_checked(&mut self, name: &str) -> bool {
        let checked = !self.is_checked(name);
        self.set_checked(name, checked);
        checked
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked_items.get(name).copied().unwrap_or(false)
    }

    pub fn select_layer(&mut self, layer: Option<i32>) {
        self.selected_layer = layer;
    }

    pub fn selected_layer(&self) -> Option<i32> {
        self.selected_layer
    }

    /// Table rows, highest count first.
    pub fn material_rows(&self) -> Vec<MaterialRow> {
        self.materials
            .sorted()
            .into_iter()
            .map(|(name, entry)| MaterialRow {
                name: name.to_string(),
                display_name: self.display_names.resolve(name).to_string(),
                count: entry.count,
                category: entry.category,
                checked: self.is_checked(name),
            })
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_count: self.materials.total_count(),
            unique_count: self.materials.unique_count(),
        }
    }

    /// Layers for the selector, ascending by `y`.
    pub fn layer_options(&self) -> Vec<LayerSummary> {
        self.layer_index.layers()
    }

    pub fn layer_view(&self) -> LayerView {
        LayerView::build(
            &self.blocks,
            &self.layer_index,
            self.bounds,
            self.selected_layer,
            &self.colors,
        )
    }

    pub fn bounds(&self) -> LayerBounds {
        self.bounds
    }

    pub fn blocks(&self) -> &[EntityRecord] {
        &self.blocks
    }

    pub fn materials(&self) -> &MaterialTally {
        &self.materials
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn display_names(&self) -> &DisplayNames {
        &self.display_names
    }

    /// Message of the last failed import, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
