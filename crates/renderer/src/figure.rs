//! Thumbnail figure composition for a single tile.
//!
//! The figure is sized from the tile dimensions so thumbnails of different
//! tiles keep their relative scale:
//!
//! ```text
//! figure inches = nominal_size * pixel_dim / dpi
//! figure pixels = figure inches * figure_dpi
//! ```
//!
//! With the defaults (5.5, 300, 100) a 256x256 tile becomes a ~469px square
//! figure. Inside it the cells are drawn with equal aspect ratio and no
//! ticks, framed, with a title line carrying the dimensions and cell type.

use crate::colormap::{normalize, Color, ColormapSpec};
use crate::text;
use image::RgbaImage;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use raster_common::{RasterError, RasterResult, Tile};
use serde::{Deserialize, Serialize};

/// Fractions of the figure reserved around the plot area.
const MARGIN_LEFT: f64 = 0.125;
const MARGIN_RIGHT: f64 = 0.9;
const MARGIN_BOTTOM: f64 = 0.11;
const MARGIN_TOP: f64 = 0.88;

/// Title size in points, and its gap to the plot area.
const TITLE_POINTS: f64 = 12.0;
const TITLE_PAD_POINTS: f64 = 6.0;

/// Smallest title height in pixels before it is drawn clipped.
const MIN_TITLE_PX: f32 = 6.0;

/// Largest figure edge we are willing to allocate.
pub const MAX_FIGURE_PX: u32 = 8192;

/// Configuration for tile thumbnails
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailStyle {
    /// Figure size in inches for a `dpi`-pixel tile (approx full size for 256x256)
    pub nominal_size: f64,
    /// Tile pixels per nominal inch
    pub dpi: f64,
    /// Output pixels per figure inch
    pub figure_dpi: f64,
    /// Lower bound on each figure edge in pixels
    pub min_extent_px: u32,
    /// Color ramp for cell values
    pub colormap: ColormapSpec,
    /// Draw the dimensions/cell-type title line
    pub show_title: bool,
}

impl Default for ThumbnailStyle {
    fn default() -> Self {
        Self {
            nominal_size: 5.5,
            dpi: 300.0,
            figure_dpi: 100.0,
            min_extent_px: 32,
            colormap: ColormapSpec::default(),
            show_title: true,
        }
    }
}

impl ThumbnailStyle {
    /// Figure size in inches for a tile of `width` x `height` cells.
    pub fn figure_size_inches(&self, width: usize, height: usize) -> (f64, f64) {
        (
            self.nominal_size * width as f64 / self.dpi,
            self.nominal_size * height as f64 / self.dpi,
        )
    }

    /// Figure size in output pixels.
    pub fn figure_size_px(&self, width: usize, height: usize) -> RasterResult<(u32, u32)> {
        if !(self.dpi > 0.0 && self.figure_dpi > 0.0 && self.nominal_size > 0.0) {
            return Err(RasterError::ConfigError(format!(
                "thumbnail sizes must be positive (nominal_size={}, dpi={}, figure_dpi={})",
                self.nominal_size, self.dpi, self.figure_dpi
            )));
        }
        let (w_in, h_in) = self.figure_size_inches(width, height);
        let to_px = |inches: f64| -> RasterResult<u32> {
            let px = (inches * self.figure_dpi).round();
            if px > MAX_FIGURE_PX as f64 {
                return Err(RasterError::RenderError(format!(
                    "figure of {} px exceeds the {} px limit",
                    px, MAX_FIGURE_PX
                )));
            }
            Ok((px as u32).max(self.min_extent_px).max(1))
        };
        Ok((to_px(w_in)?, to_px(h_in)?))
    }

    fn title_px(&self) -> f32 {
        (TITLE_POINTS * self.figure_dpi / 72.0) as f32
    }
}

/// Compact metadata line drawn above the cells, e.g.
/// `[256, 256], CellType(float64, nan)`.
pub fn thumbnail_title(tile: &Tile) -> String {
    let [w, h] = tile.dimensions();
    format!("[{}, {}], {}", w, h, tile.cell_type.repr())
}

/// Placement of the cell image inside the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Fit a `cols` x `rows` grid into the plot box with equal aspect, centered.
pub fn plot_area(fig_w: u32, fig_h: u32, cols: usize, rows: usize) -> PlotArea {
    let box_x0 = MARGIN_LEFT * fig_w as f64;
    let box_x1 = MARGIN_RIGHT * fig_w as f64;
    let box_y0 = (1.0 - MARGIN_TOP) * fig_h as f64;
    let box_y1 = (1.0 - MARGIN_BOTTOM) * fig_h as f64;
    let (box_w, box_h) = (box_x1 - box_x0, box_y1 - box_y0);

    let aspect = cols.max(1) as f64 / rows.max(1) as f64;
    let (w, h) = if box_w / box_h > aspect {
        (box_h * aspect, box_h)
    } else {
        (box_w, box_w / aspect)
    };

    let width = (w.round() as u32).max(1);
    let height = (h.round() as u32).max(1);
    let x = (box_x0 + (box_w - width as f64) / 2.0).round().max(0.0) as u32;
    let y = (box_y0 + (box_h - height as f64) / 2.0).round().max(0.0) as u32;

    PlotArea {
        x,
        y,
        width,
        height,
    }
}

/// Render a tile into an RGBA figure.
///
/// Returns `Ok(None)` when the tile has no cells. Masked cells (no-data and
/// NaN) are left as background.
pub fn render_tile_figure(tile: &Tile, style: &ThumbnailStyle) -> RasterResult<Option<RgbaImage>> {
    let Some(cells) = tile.cell_data() else {
        return Ok(None);
    };
    tile.validate()?;

    let [cols, rows] = tile.dimensions();
    let (fig_w, fig_h) = style.figure_size_px(cols, rows)?;
    let lut = style.colormap.resolve()?.lookup_table();

    let mut img = RgbaImage::from_pixel(fig_w, fig_h, Color::WHITE.to_rgba());
    let area = plot_area(fig_w, fig_h, cols, rows);

    if let Some((min_val, max_val)) = tile.value_range() {
        let cell_type = tile.cell_type;
        for py in 0..area.height {
            let row = ((py as usize * rows) / area.height as usize).min(rows - 1);
            for px in 0..area.width {
                let col = ((px as usize * cols) / area.width as usize).min(cols - 1);
                let value = cells[row * cols + col];
                if cell_type.is_no_data(value) {
                    continue;
                }
                let color = lut.color(normalize(value, min_val, max_val));
                let (x, y) = (area.x + px, area.y + py);
                if x < fig_w && y < fig_h {
                    img.put_pixel(x, y, color.to_rgba());
                }
            }
        }
    }

    // Frame just outside the cells.
    let frame = Rect::at(area.x as i32 - 1, area.y as i32 - 1).of_size(area.width + 2, area.height + 2);
    draw_hollow_rect_mut(&mut img, frame, Color::BLACK.to_rgba());

    if style.show_title {
        draw_title(&mut img, &thumbnail_title(tile), area, style);
    }

    tracing::debug!(
        cols,
        rows,
        fig_w,
        fig_h,
        "Rendered tile figure"
    );

    Ok(Some(img))
}

fn draw_title(img: &mut RgbaImage, title: &str, area: PlotArea, style: &ThumbnailStyle) {
    let font = match text::load_font() {
        Some(f) => f,
        None => {
            tracing::warn!("Failed to load title font, drawing thumbnail without title");
            return;
        }
    };

    // Shrink until the title fits the figure width.
    let mut px = style.title_px().max(MIN_TITLE_PX);
    let mut size = text::text_size(&font, title, px);
    while px > MIN_TITLE_PX && size.0 > img.width() {
        px = (px * 0.9).max(MIN_TITLE_PX);
        size = text::text_size(&font, title, px);
    }

    let pad = (TITLE_PAD_POINTS * style.figure_dpi / 72.0).round() as i32;
    let (text_w, text_h) = (size.0 as i32, size.1 as i32);
    let center_x = area.x as i32 + area.width as i32 / 2;
    let x = (center_x - text_w / 2).max(0);
    let y = (area.y as i32 - pad - text_h).max(0);

    text::draw_text(img, &font, title, x, y, px, Color::BLACK);
}
