//! Tests for tile thumbnails as PNG and inline HTML.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use notebook_display::tile_html::{png_to_html, SOFTWARE};
use notebook_display::{tile_to_html, tile_to_html_with, tile_to_png, tile_to_png_with};
use raster_common::{CellType, RasterError, Tile};
use renderer::ThumbnailStyle;
use test_utils::{
    decode_png, empty_tile, gradient_tile, half_nodata_tile, is_png, malformed_tile,
    png_dimensions, png_text_chunks,
};

const IMG_PREFIX: &str = "<img src=\"data:image/png;base64,";
const IMG_SUFFIX: &str = "\" />";

// ============================================================================
// tile_to_png
// ============================================================================

#[test]
fn test_absent_cells_give_no_png() {
    assert!(tile_to_png(&empty_tile(16, 16)).unwrap().is_none());
}

#[test]
fn test_empty_cells_give_no_png() {
    let tile = Tile {
        cols: 3,
        rows: 3,
        cell_type: CellType::float64(),
        cells: Some(Vec::new()),
    };
    assert!(tile_to_png(&tile).unwrap().is_none());
}

#[test]
fn test_png_signature() {
    let bytes = tile_to_png(&gradient_tile(32, 32)).unwrap().unwrap();
    assert!(is_png(&bytes));
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_png_size_follows_tile() {
    let bytes = tile_to_png(&gradient_tile(256, 256)).unwrap().unwrap();
    assert_eq!(png_dimensions(&bytes), Some((469, 469)));
    assert_eq!(decode_png(&bytes).dimensions(), (469, 469));
}

#[test]
fn test_png_metadata() {
    let bytes = tile_to_png(&half_nodata_tile(64, 32)).unwrap().unwrap();
    let text = png_text_chunks(&bytes);

    assert!(text.contains(&("Software".to_string(), SOFTWARE.to_string())));
    assert!(text.contains(&(
        "Title".to_string(),
        "[64, 32], CellType(int16, -9999)".to_string()
    )));
}

#[test]
fn test_malformed_tile_propagates() {
    let err = tile_to_png(&malformed_tile()).unwrap_err();
    assert!(matches!(err, RasterError::MalformedCells { expected: 16, actual: 3, .. }));
}

#[test]
fn test_zero_dimensions_with_data() {
    let tile = Tile {
        cols: 0,
        rows: 2,
        cell_type: CellType::float64(),
        cells: Some(vec![1.0, 2.0]),
    };
    assert!(matches!(
        tile_to_png(&tile),
        Err(RasterError::InvalidDimensions(_))
    ));
}

#[test]
fn test_custom_style() {
    let style = ThumbnailStyle {
        nominal_size: 11.0,
        ..Default::default()
    };
    let bytes = tile_to_png_with(&gradient_tile(60, 30), &style).unwrap().unwrap();
    assert_eq!(png_dimensions(&bytes), Some((220, 110)));
}

// ============================================================================
// tile_to_html
// ============================================================================

#[test]
fn test_absent_cells_give_no_html() {
    assert!(tile_to_html(&empty_tile(8, 8)).unwrap().is_none());
}

#[test]
fn test_html_shape_and_payload() {
    let tile = gradient_tile(48, 48);
    let html = tile_to_html(&tile).unwrap().unwrap();

    assert!(html.starts_with(IMG_PREFIX));
    assert!(html.ends_with(IMG_SUFFIX));
    let data = &html[IMG_PREFIX.len()..html.len() - IMG_SUFFIX.len()];
    assert!(!data.contains('\n'));

    let decoded = STANDARD.decode(data).unwrap();
    assert_eq!(decoded, tile_to_png(&tile).unwrap().unwrap());
}

#[test]
fn test_html_with_style_matches_png_with_style() {
    let tile = gradient_tile(20, 40);
    let style = ThumbnailStyle {
        show_title: false,
        ..Default::default()
    };
    let html = tile_to_html_with(&tile, &style).unwrap().unwrap();
    let png = tile_to_png_with(&tile, &style).unwrap().unwrap();
    assert_eq!(html, png_to_html(&png));
}

#[test]
fn test_png_to_html_padding() {
    assert_eq!(png_to_html(&[1, 2]), "<img src=\"data:image/png;base64,AQI=\" />");
}
