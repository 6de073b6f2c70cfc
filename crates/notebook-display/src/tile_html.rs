//! Tile thumbnails as PNG bytes and inline HTML.

use crate::options::global_options;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use raster_common::{RasterResult, Tile};
use renderer::{png, render_tile_figure, thumbnail_title, ThumbnailStyle};

/// Value of the PNG `Software` text chunk.
pub const SOFTWARE: &str = concat!("notebook-display ", env!("CARGO_PKG_VERSION"));

/// Render a tile thumbnail as PNG using the global thumbnail style.
///
/// Returns `Ok(None)` when the tile carries no cells.
pub fn tile_to_png(tile: &Tile) -> RasterResult<Option<Vec<u8>>> {
    let style = global_options().snapshot().thumbnail;
    tile_to_png_with(tile, &style)
}

/// Render a tile thumbnail as PNG with an explicit style.
pub fn tile_to_png_with(tile: &Tile, style: &ThumbnailStyle) -> RasterResult<Option<Vec<u8>>> {
    let Some(figure) = render_tile_figure(tile, style)? else {
        tracing::debug!(
            cols = tile.cols,
            rows = tile.rows,
            "Tile has no cells, skipping thumbnail"
        );
        return Ok(None);
    };

    let title = thumbnail_title(tile);
    let bytes = png::encode_png(&figure, &[("Software", SOFTWARE), ("Title", &title)])?;

    tracing::debug!(
        cols = tile.cols,
        rows = tile.rows,
        width = figure.width(),
        height = figure.height(),
        bytes = bytes.len(),
        "Encoded tile thumbnail"
    );
    Ok(Some(bytes))
}

/// Inline `<img>` tag for a tile, using the global thumbnail style.
///
/// `Ok(None)` when the tile has no cells to draw.
pub fn tile_to_html(tile: &Tile) -> RasterResult<Option<String>> {
    let style = global_options().snapshot().thumbnail;
    tile_to_html_with(tile, &style)
}

/// Inline `<img>` tag for a tile rendered with an explicit style.
///
/// `Ok(None)` when the tile has no cells to draw.
pub fn tile_to_html_with(tile: &Tile, style: &ThumbnailStyle) -> RasterResult<Option<String>> {
    Ok(tile_to_png_with(tile, style)?.map(|bytes| png_to_html(&bytes)))
}

/// `<img>` tag carrying PNG bytes as a base64 data URI.
pub fn png_to_html(bytes: &[u8]) -> String {
    format!("<img src=\"data:image/png;base64,{}\" />", STANDARD.encode(bytes))
}
