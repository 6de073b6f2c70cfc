//! Tests for dataframe HTML with inline thumbnails.
//!
//! Each test uses its own `OptionsStore` so nothing touches the global
//! options.

use notebook_display::tile_html::tile_to_html_with;
use notebook_display::{
    classify_column, dataframe_to_html_with, dataframe_to_html_with_formatters, CellFormatter, Column,
    DataFrame, DisplayOptions, OptionsStore, ShowDimensions, Value,
};
use raster_common::RasterError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use test_utils::{checkerboard_tile, empty_tile, gradient_tile, malformed_tile};

const IMG_TAG: &str = "<img src=\"data:image/png;base64,";

// ============================================================================
// Helper functions
// ============================================================================

fn tile_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new("id", [1i64, 2, 3]),
        Column::new(
            "tile",
            vec![
                Value::from(gradient_tile(16, 16)),
                Value::from(checkerboard_tile(8, 8)),
                Value::Null,
            ],
        ),
        Column::new("label", ["a", "b", "c"]),
    ])
    .unwrap()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

// ============================================================================
// Column classification
// ============================================================================

#[test]
fn test_classify_column_uses_first_row() {
    let tiles = Column::new("t", vec![Value::from(gradient_tile(2, 2)), Value::Null]);
    let late = Column::new("t", vec![Value::Null, Value::from(gradient_tile(2, 2))]);
    let empty = Column::new("t", Vec::<Value>::new());

    assert!(classify_column(&tiles));
    assert!(!classify_column(&late));
    assert!(!classify_column(&empty));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_tile_column_renders_images() {
    let store = OptionsStore::default();
    let html = dataframe_to_html_with(&tile_frame(), &store).unwrap().unwrap();

    assert_eq!(count(&html, IMG_TAG), 2);
    assert!(html.contains("<td>null</td>"));
    assert!(html.contains("<td>a</td>"));
    assert!(html.starts_with("<div>\n<style scoped>"));
}

#[test]
fn test_images_are_not_truncated() {
    let store = OptionsStore::default();
    let tile = gradient_tile(16, 16);
    let frame = DataFrame::new(vec![Column::new("tile", vec![Value::from(tile.clone())])]).unwrap();

    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
    let expected = tile_to_html_with(&tile, &store.snapshot().thumbnail)
        .unwrap()
        .unwrap();
    assert!(expected.len() > 50);
    assert!(html.contains(&expected));
}

#[test]
fn test_tile_without_cells_falls_back_to_repr() {
    let store = OptionsStore::default();
    let frame = DataFrame::new(vec![Column::new(
        "tile",
        vec![Value::from(gradient_tile(4, 4)), Value::from(empty_tile(5, 6))],
    )])
    .unwrap();

    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
    assert_eq!(count(&html, IMG_TAG), 1);
    assert!(html.contains("Tile(dimensions=[5, 6], cell_type=CellType(float64, nan), cells=none)"));
}

#[test]
fn test_late_tiles_render_as_repr() {
    let store = OptionsStore::default();
    let frame = DataFrame::new(vec![Column::new(
        "mixed",
        vec![Value::Int(7), Value::from(gradient_tile(8, 8))],
    )])
    .unwrap();

    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
    assert_eq!(count(&html, IMG_TAG), 0);
    assert!(html.contains("Tile(dimensions=[8, 8], cell_type=CellType(float64, nan), cells=...)"));
}

#[test]
fn test_cells_are_not_escaped_and_links_render() {
    let store = OptionsStore::default();
    let frame = DataFrame::new(vec![
        Column::new("tile", vec![Value::from(gradient_tile(4, 4)), Value::from(gradient_tile(4, 4))]),
        Column::new("note", ["<b>bold</b>", "https://example.com/tiles"]),
    ])
    .unwrap();

    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
    assert!(html.contains("<td><b>bold</b></td>"));
    assert!(html.contains(
        "<a href=\"https://example.com/tiles\" target=\"_blank\">https://example.com/tiles</a>"
    ));
}

#[test]
fn test_row_limit_applies() {
    let store = OptionsStore::new(DisplayOptions {
        max_rows: Some(4),
        ..Default::default()
    });
    let tiles: Vec<Value> = (0..10).map(|_| Value::from(gradient_tile(4, 4))).collect();
    let frame = DataFrame::new(vec![Column::new("tile", tiles)]).unwrap();

    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
    assert_eq!(count(&html, IMG_TAG), 4);
    assert!(html.contains("<th>...</th>"));
    assert!(html.contains("<p>10 rows × 1 columns</p>"));
}

#[test]
fn test_show_dimensions_always() {
    let store = OptionsStore::new(DisplayOptions {
        show_dimensions: ShowDimensions::Always,
        ..Default::default()
    });
    let html = dataframe_to_html_with(&tile_frame(), &store).unwrap().unwrap();
    assert!(html.contains("<p>3 rows × 3 columns</p>"));
}

// ============================================================================
// Options handling
// ============================================================================

#[test]
fn test_html_disabled_returns_none() {
    let store = OptionsStore::new(DisplayOptions {
        notebook_repr_html: false,
        ..Default::default()
    });
    assert!(dataframe_to_html_with(&tile_frame(), &store).unwrap().is_none());
    assert!(dataframe_to_html_with(&DataFrame::empty(["x"]), &store)
        .unwrap()
        .is_none());
}

#[test]
fn test_zero_rows_uses_default_html() {
    let store = OptionsStore::default();
    let frame = DataFrame::empty(["tile", "id"]);

    let html = dataframe_to_html_with(&frame, &store).unwrap();
    assert_eq!(html, frame.repr_html(&store.snapshot()).unwrap());
    assert!(html.unwrap().contains("<th>tile</th>"));
}

#[test]
fn test_colwidth_restored_after_success() {
    let store = OptionsStore::new(DisplayOptions {
        max_colwidth: Some(12),
        ..Default::default()
    });
    dataframe_to_html_with(&tile_frame(), &store).unwrap();
    assert_eq!(store.max_colwidth(), Some(12));
}

#[test]
fn test_colwidth_restored_after_error() {
    let store = OptionsStore::default();
    let frame = DataFrame::new(vec![Column::new("tile", vec![Value::from(malformed_tile())])]).unwrap();

    let err = dataframe_to_html_with(&frame, &store).unwrap_err();
    assert!(matches!(err, RasterError::MalformedCells { .. }));
    assert_eq!(store.max_colwidth(), Some(50));
}

#[test]
fn test_colwidth_restored_after_panic() {
    let store = OptionsStore::default();
    let frame = tile_frame();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let failing: CellFormatter<'_> = Box::new(|_: &Value| -> raster_common::RasterResult<String> {
            panic!("label formatter failed")
        });
        dataframe_to_html_with_formatters(&frame, &store, [("label".to_string(), failing)])
    }));
    assert!(result.is_err());
    assert_eq!(store.max_colwidth(), Some(50));

    // The store still renders normally afterwards.
    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
    assert_eq!(count(&html, IMG_TAG), 2);
}

#[test]
fn test_concurrent_renders_restore_colwidth() {
    let store = Arc::new(OptionsStore::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let frame = tile_frame();
                for _ in 0..5 {
                    let html = dataframe_to_html_with(&frame, &store).unwrap().unwrap();
                    assert_eq!(count(&html, IMG_TAG), 2);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.max_colwidth(), Some(50));
}

// ============================================================================
// Extra cell formatters
// ============================================================================

#[test]
fn test_extra_formatter_applies_to_plain_column() {
    let store = OptionsStore::default();
    let upper: CellFormatter<'_> = Box::new(|v: &Value| Ok(format!("<b>{}</b>", v.repr().to_uppercase())));
    let html = dataframe_to_html_with_formatters(&tile_frame(), &store, [("label".to_string(), upper)])
        .unwrap()
        .unwrap();
    assert!(html.contains("<b>A</b>"));
    assert!(html.contains("<b>C</b>"));
    assert_eq!(count(&html, IMG_TAG), 2);
}

#[test]
fn test_extra_formatter_cannot_replace_thumbnails() {
    let store = OptionsStore::default();
    let plain: CellFormatter<'_> = Box::new(|_: &Value| Ok("plain".to_string()));
    let html = dataframe_to_html_with_formatters(&tile_frame(), &store, [("tile".to_string(), plain)])
        .unwrap()
        .unwrap();
    assert_eq!(count(&html, IMG_TAG), 2);
    assert!(!html.contains("plain"));
}
