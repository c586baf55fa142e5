//! Plain-text layer grids.

use crate::layers::LayerGrid;
use indexmap::IndexMap;
use std::fmt::Write;

const EMPTY_SYMBOL: char = '.';
const OVERFLOW_SYMBOL: char = '#';
const SYMBOL_POOL: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Render a grid as one text line per `z` row, followed by a legend.
///
/// Each name gets a single-character symbol, preferring the first letter of
/// its id (the part after any `namespace:`).
pub fn render_text(grid: &LayerGrid) -> String {
    let symbols = assign_symbols(grid);

    let mut out = String::with_capacity((grid.width() + 1) * grid.depth() + 64);
    writeln!(
        out,
        "Layer y={} (x {}..={}, z {}..={})",
        grid.y, grid.bounds.min_x, grid.bounds.max_x, grid.bounds.min_z, grid.bounds.max_z
    )
    .unwrap();

    for row in grid.rows() {
        for cell in row {
            let symbol = match &cell.occupant {
                Some(occupant) => symbols[occupant.name.as_str()],
                None => EMPTY_SYMBOL,
            };
            out.push(symbol);
        }
        out.push('\n');
    }

    if !symbols.is_empty() {
        writeln!(out).unwrap();
        for (name, symbol) in &symbols {
            writeln!(out, "{} {}", symbol, name).unwrap();
        }
    }

    out
}

fn assign_symbols(grid: &LayerGrid) -> IndexMap<&str, char> {
    let mut symbols: IndexMap<&str, char> = IndexMap::new();

    for occupant in grid.cells.iter().filter_map(|c| c.occupant.as_ref()) {
        let name = occupant.name.as_str();
        if symbols.contains_key(name) {
            continue;
        }

        let id = name.rsplit(':').next().unwrap_or(name);
        let preferred = id
            .chars()
            .find(char::is_ascii_alphanumeric)
            .map(|c| [c.to_ascii_lowercase(), c.to_ascii_uppercase()]);

        let taken = |c: &char| symbols.values().any(|s| s == c);
        let symbol = preferred
            .into_iter()
            .flatten()
            .chain(SYMBOL_POOL.chars())
            .find(|c| !taken(c))
            .unwrap_or(OVERFLOW_SYMBOL);

        symbols.insert(name, symbol);
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMap;
    use crate::layers::{LayerBounds, LayerIndex};
    use crate::types::EntityRecord;

    fn grid_of(records: &[EntityRecord], y: i32) -> LayerGrid {
        let index = LayerIndex::build(records);
        let bounds = LayerBounds::from_records(records);
        LayerGrid::build(records, &index, bounds, y, &ColorMap::new()).unwrap()
    }

    #[test]
    fn test_render_text() {
        let records = vec![
            EntityRecord::new("minecraft:stone").at(0, 0, 0),
            EntityRecord::new("dirt").at(2, 0, 3),
        ];
        let text = render_text(&grid_of(&records, 0));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Layer y=0 (x 0..=2, z 0..=3)");
        assert_eq!(&lines[1..5], &["s..", "...", "...", "..d"]);
        assert!(lines.contains(&"s minecraft:stone"));
        assert!(lines.contains(&"d dirt"));
    }

    #[test]
    fn test_symbol_collisions() {
        let records = vec![
            EntityRecord::new("stone").at(0, 0, 0),
            EntityRecord::new("sand").at(1, 0, 0),
            EntityRecord::new("spruce_log").at(2, 0, 0),
        ];
        let text = render_text(&grid_of(&records, 0));
        assert_eq!(text.lines().nth(1), Some("sSa"));
    }
}
