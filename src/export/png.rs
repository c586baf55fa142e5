//! PNG rendering of layer grids.

use crate::error::{PrefabError, Result};
use crate::layers::LayerGrid;
use image::{ImageEncoder, Rgba, RgbaImage};

/// Options for [`render_png`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Edge length of one cell in pixels.
    pub cell_size: u32,
    /// Fill for cells with no block.
    pub empty_color: [u8; 4],
    /// Draw a one-pixel line on the right and bottom edge of every cell.
    pub grid_lines: bool,
    pub grid_line_color: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 16,
            empty_color: [243, 244, 246, 255],
            grid_lines: true,
            grid_line_color: [209, 213, 219, 255],
        }
    }
}

impl RenderConfig {
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size.max(1);
        self
    }

    pub fn with_grid_lines(mut self, grid_lines: bool) -> Self {
        self.grid_lines = grid_lines;
        self
    }

    pub fn with_empty_color(mut self, color: [u8; 4]) -> Self {
        self.empty_color = color;
        self
    }
}

/// Rasterize a grid, one square per cell, and encode it as PNG.
pub fn render_png(grid: &LayerGrid, config: &RenderConfig) -> Result<Vec<u8>> {
    let image = rasterize(grid, config)?;

    let mut bytes = Vec::new();
    let cursor = std::io::Cursor::new(&mut bytes);
    let encoder = image::codecs::png::PngEncoder::new(cursor);

    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(bytes)
}

fn rasterize(grid: &LayerGrid, config: &RenderConfig) -> Result<RgbaImage> {
    let cell = config.cell_size.max(1);
    let too_large = || PrefabError::Export(format!("Layer {} is too large to rasterize", grid.y));

    let width = u32::try_from(grid.width())
        .ok()
        .and_then(|w| w.checked_mul(cell))
        .ok_or_else(too_large)?;
    let height = u32::try_from(grid.depth())
        .ok()
        .and_then(|h| h.checked_mul(cell))
        .ok_or_else(too_large)?;

    let mut image = RgbaImage::from_pixel(width, height, Rgba(config.empty_color));
    let draw_lines = config.grid_lines && cell > 1;

    for (row, cells) in grid.rows().enumerate() {
        for (col, grid_cell) in cells.iter().enumerate() {
            let fill = grid_cell
                .occupant
                .as_ref()
                .map(|o| o.color.to_rgba())
                .unwrap_or(config.empty_color);

            let x0 = col as u32 * cell;
            let y0 = row as u32 * cell;
            for dy in 0..cell {
                for dx in 0..cell {
                    let on_line = draw_lines && (dx == cell - 1 || dy == cell - 1);
                    let color = if on_line { config.grid_line_color } else { fill };
                    image.put_pixel(x0 + dx, y0 + dy, Rgba(color));
                }
            }
        }
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorMap, HslColor};
    use crate::layers::{LayerBounds, LayerIndex};
    use crate::types::EntityRecord;

    fn scenario_grid() -> LayerGrid {
        let records = vec![
            EntityRecord::new("stone").at(0, 0, 0),
            EntityRecord::new("dirt").at(2, 0, 3),
        ];
        let index = LayerIndex::build(&records);
        let bounds = LayerBounds::from_records(&records);
        let mut colors = ColorMap::new();
        colors.prime(["stone", "dirt"]);
        LayerGrid::build(&records, &index, bounds, 0, &colors).unwrap()
    }

    #[test]
    fn test_rasterize_cells() {
        let config = RenderConfig::default().with_cell_size(4);
        let image = rasterize(&scenario_grid(), &config).unwrap();

        assert_eq!(image.dimensions(), (12, 16));
        let stone = HslColor::for_name("stone").to_rgba();
        assert_eq!(image.get_pixel(0, 0).0, stone);
        assert_eq!(image.get_pixel(3, 3).0, config.grid_line_color);
        assert_eq!(image.get_pixel(4, 0).0, config.empty_color);
        assert_eq!(image.get_pixel(8, 12).0, HslColor::for_name("dirt").to_rgba());
    }

    #[test]
    fn test_rasterize_without_grid_lines() {
        let config = RenderConfig::default().with_cell_size(2).with_grid_lines(false);
        let image = rasterize(&scenario_grid(), &config).unwrap();
        assert_eq!(image.get_pixel(1, 1).0, HslColor::for_name("stone").to_rgba());
    }

    #[test]
    fn test_render_png_signature() {
        let bytes = render_png(&scenario_grid(), &RenderConfig::default()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encoder_errors_are_image_errors() {
        let limit = image::error::LimitError::from_kind(image::error::LimitErrorKind::DimensionError);
        let err: PrefabError = image::ImageError::Limits(limit).into();
        assert!(matches!(err, PrefabError::Image(_)));
        assert!(err.to_string().starts_with("Image error"));
    }
}
