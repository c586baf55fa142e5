//! Per-layer grid views of a prefab.
//!
//! Blocks are grouped by their `y` coordinate. A selected layer is rendered as
//! a dense grid over the x/z extent of the *whole* prefab, so every layer has
//! the same size and switching layers doesn't shift the picture.

use crate::color::{ColorMap, HslColor};
use crate::types::{BlockPosition, EntityRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Largest grid [`LayerGrid::build`] will allocate. Layers whose extent has
/// more cells than this are reported as [`LayerView::TooLarge`].
pub const MAX_GRID_CELLS: u64 = 1 << 20;

/// Inclusive x/z extent of all positioned blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LayerBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl LayerBounds {
    pub fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Bounds over every block with a full position, regardless of layer.
    /// Falls back to the single cell at the origin when there are none.
    pub fn from_records(records: &[EntityRecord]) -> Self {
        let mut positions = records.iter().filter_map(EntityRecord::position);

        let Some(first) = positions.next() else {
            return Self::default();
        };

        positions.fold(
            Self::new(first.x, first.x, first.z, first.z),
            |bounds, pos| Self {
                min_x: bounds.min_x.min(pos.x),
                max_x: bounds.max_x.max(pos.x),
                min_z: bounds.min_z.min(pos.z),
                max_z: bounds.max_z.max(pos.z),
            },
        )
    }

    /// Number of columns (x values).
    pub fn width(&self) -> u64 {
        (self.max_x as i64 - self.min_x as i64 + 1) as u64
    }

    /// Number of rows (z values).
    pub fn depth(&self) -> u64 {
        (self.max_z as i64 - self.min_z as i64 + 1) as u64
    }

    /// Cells in the extent, or `None` when it exceeds [`MAX_GRID_CELLS`].
    pub fn cell_count(&self) -> Option<usize> {
        self.width()
            .checked_mul(self.depth())
            .filter(|&count| count <= MAX_GRID_CELLS)
            .and_then(|count| usize::try_from(count).ok())
    }
}

/// One entry of the layer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub y: i32,
    pub count: usize,
}

/// Record indices grouped by `y`.
///
/// Only records with a name and all three coordinates can be placed on a
/// layer; the rest are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerIndex {
    layers: BTreeMap<i32, Vec<usize>>,
}

impl LayerIndex {
    pub fn build(records: &[EntityRecord]) -> Self {
        let mut layers: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            if record.name().is_none() {
                continue;
            }
            if let Some(pos) = record.position() {
                layers.entry(pos.y).or_default().push(i);
            }
        }
        Self { layers }
    }

    /// Layers in ascending `y`, with their block counts.
    pub fn layers(&self) -> Vec<LayerSummary> {
        self.layers
            .iter()
            .map(|(&y, indices)| LayerSummary {
                y,
                count: indices.len(),
            })
            .collect()
    }

    pub fn contains(&self, y: i32) -> bool {
        self.layers.contains_key(&y)
    }

    /// Indices into the record list of the blocks on layer `y`, in input order.
    pub fn records_on(&self, y: i32) -> &[usize] {
        self.layers.get(&y).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// The block shown in a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellOccupant {
    pub name: String,
    pub color: HslColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
}

/// One cell of a layer grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
    pub tooltip: String,
    pub occupant: Option<CellOccupant>,
}

impl GridCell {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Dense grid for one layer: `depth` rows of `width` cells, rows ordered by
/// `z` and columns by `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerGrid {
    pub y: i32,
    pub bounds: LayerBounds,
    pub cells: Vec<GridCell>,
}

impl LayerGrid {
    /// Build the grid for layer `y`, or `None` when nothing is on it or the
    /// extent has more than [`MAX_GRID_CELLS`] cells.
    ///
    /// When two blocks share an `(x, z)` cell, the one later in the input wins.
    pub fn build(
        records: &[EntityRecord],
        index: &LayerIndex,
        bounds: LayerBounds,
        y: i32,
        colors: &ColorMap,
    ) -> Option<Self> {
        let on_layer = index.records_on(y);
        if on_layer.is_empty() {
            return None;
        }
        let cell_count = bounds.cell_count()?;

        let mut lookup: HashMap<(i32, i32), &EntityRecord> = HashMap::with_capacity(on_layer.len());
        for &i in on_layer {
            let record = &records[i];
            if let (Some(x), Some(z)) = (record.x, record.z) {
                lookup.insert((x, z), record);
            }
        }

        let mut cells = Vec::with_capacity(cell_count);
        for z in bounds.min_z..=bounds.max_z {
            for x in bounds.min_x..=bounds.max_x {
                let pos = BlockPosition::new(x, y, z);
                let occupant = lookup
                    .get(&(x, z))
                    .and_then(|record| record.name().map(|name| (name, record.rotation)));

                let cell = match occupant {
                    Some((name, rotation)) => GridCell {
                        x,
                        z,
                        tooltip: format!("{} {}", name, pos),
                        occupant: Some(CellOccupant {
                            name: name.to_string(),
                            color: colors.color_for(name),
                            rotation,
                        }),
                    },
                    None => GridCell {
                        x,
                        z,
                        tooltip: format!("Empty {}", pos),
                        occupant: None,
                    },
                };
                cells.push(cell);
            }
        }

        Some(Self { y, bounds, cells })
    }

    // A built grid never exceeds MAX_GRID_CELLS, so both fit in usize.
    pub fn width(&self) -> usize {
        self.bounds.width() as usize
    }

    pub fn depth(&self) -> usize {
        self.bounds.depth() as usize
    }

    /// The cell at world coordinates `(x, z)`.
    pub fn cell(&self, x: i32, z: i32) -> Option<&GridCell> {
        if x < self.bounds.min_x || x > self.bounds.max_x || z < self.bounds.min_z || z > self.bounds.max_z {
            return None;
        }
        let col = (x as i64 - self.bounds.min_x as i64) as usize;
        let row = (z as i64 - self.bounds.min_z as i64) as usize;
        self.cells.get(row * self.width() + col)
    }

    /// Rows of cells, one per `z`.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(self.width())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}

/// What the layer panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LayerView {
    /// No layer picked yet.
    NoLayerSelected,
    /// A layer is picked but has no blocks.
    EmptyLayer { y: i32 },
    /// A layer is picked but the prefab's extent is too big to lay out.
    TooLarge { y: i32, width: u64, depth: u64 },
    Grid(LayerGrid),
}

impl LayerView {
    pub fn build(
        records: &[EntityRecord],
        index: &LayerIndex,
        bounds: LayerBounds,
        selected: Option<i32>,
        colors: &ColorMap,
    ) -> Self {
        let Some(y) = selected else {
            return LayerView::NoLayerSelected;
        };
        if index.records_on(y).is_empty() {
            return LayerView::EmptyLayer { y };
        }
        if bounds.cell_count().is_none() {
            log::warn!(
                "Layer {} spans {}x{} cells, more than {}",
                y,
                bounds.width(),
                bounds.depth(),
                MAX_GRID_CELLS
            );
            return LayerView::TooLarge {
                y,
                width: bounds.width(),
                depth: bounds.depth(),
            };
        }
        match LayerGrid::build(records, index, bounds, y, colors) {
            Some(grid) => LayerView::Grid(grid),
            None => LayerView::EmptyLayer { y },
        }
    }

    pub fn grid(&self) -> Option<&LayerGrid> {
        match self {
            LayerView::Grid(grid) => Some(grid),
            _ => None,
        }
    }
}
