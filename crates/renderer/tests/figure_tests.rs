//! Tests for thumbnail figure composition.

use raster_common::{BaseCellType, CellType, RasterError, Tile};
use renderer::figure::{plot_area, MAX_FIGURE_PX};
use renderer::{render_tile_figure, thumbnail_title, Color, Colormap, ColormapSpec, ThumbnailStyle};
use test_utils::{
    checkerboard_tile, count_non_background, empty_tile, gradient_tile, half_nodata_tile,
    malformed_tile,
};

// ============================================================================
// Sizing
// ============================================================================

#[test]
fn test_figure_size_default_256() {
    let style = ThumbnailStyle::default();
    // 5.5 * 256 / 300 inches at 100 dpi
    assert_eq!(style.figure_size_px(256, 256).unwrap(), (469, 469));
}

#[test]
fn test_figure_size_scales_with_tile() {
    let style = ThumbnailStyle::default();
    let (w_small, _) = style.figure_size_px(128, 128).unwrap();
    let (w_large, _) = style.figure_size_px(512, 512).unwrap();
    assert!(w_large > 3 * w_small);
}

#[test]
fn test_figure_size_has_floor() {
    let style = ThumbnailStyle::default();
    assert_eq!(style.figure_size_px(2, 2).unwrap(), (32, 32));
}

#[test]
fn test_figure_size_rejects_huge_tiles() {
    let style = ThumbnailStyle::default();
    let err = style.figure_size_px(1_000_000, 10).unwrap_err();
    assert!(matches!(err, RasterError::RenderError(_)));
}

#[test]
fn test_figure_size_rejects_bad_style() {
    let style = ThumbnailStyle {
        dpi: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        style.figure_size_px(10, 10),
        Err(RasterError::ConfigError(_))
    ));
}

// ============================================================================
// Title
// ============================================================================

#[test]
fn test_thumbnail_title() {
    let tile = gradient_tile(256, 128);
    assert_eq!(thumbnail_title(&tile), "[256, 128], CellType(float64, nan)");

    let tile = checkerboard_tile(4, 4);
    assert_eq!(thumbnail_title(&tile), "[4, 4], CellType(uint8, none)");
}

#[test]
fn test_title_draws_above_plot() {
    let tile = gradient_tile(256, 256);
    let with_title = render_tile_figure(&tile, &ThumbnailStyle::default())
        .unwrap()
        .unwrap();
    let without = render_tile_figure(
        &tile,
        &ThumbnailStyle {
            show_title: false,
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();

    assert!(count_non_background(&with_title) > count_non_background(&without));
    let area = plot_area(469, 469, 256, 256);
    let strip = (0..with_title.width())
        .flat_map(|x| (0..area.y.saturating_sub(1)).map(move |y| (x, y)))
        .filter(|&(x, y)| with_title.get_pixel(x, y).0 != [255, 255, 255, 255])
        .count();
    assert!(strip > 0, "no title pixels above the plot");
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_empty_tile_renders_nothing() {
    let result = render_tile_figure(&empty_tile(10, 10), &ThumbnailStyle::default()).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_malformed_tile_errors() {
    let err = render_tile_figure(&malformed_tile(), &ThumbnailStyle::default()).unwrap_err();
    assert!(matches!(err, RasterError::MalformedCells { .. }));
}

#[test]
fn test_gradient_corners_follow_colormap() {
    let tile = gradient_tile(64, 64);
    let style = ThumbnailStyle {
        colormap: ColormapSpec::Named("gray".to_string()),
        show_title: false,
        ..Default::default()
    };
    let img = render_tile_figure(&tile, &style).unwrap().unwrap();
    let (w, h) = img.dimensions();
    let area = plot_area(w, h, 64, 64);

    let top_left = img.get_pixel(area.x, area.y);
    let bottom_right = img.get_pixel(area.x + area.width - 1, area.y + area.height - 1);
    assert_eq!(*top_left, Color::BLACK.to_rgba());
    assert_eq!(*bottom_right, Colormap::gray().color_at(1.0).to_rgba());
}

#[test]
fn test_nodata_cells_stay_background() {
    let tile = half_nodata_tile(32, 32);
    let style = ThumbnailStyle {
        show_title: false,
        ..Default::default()
    };
    let img = render_tile_figure(&tile, &style).unwrap().unwrap();
    let (w, h) = img.dimensions();
    let area = plot_area(w, h, 32, 32);

    let y = area.y + area.height / 2;
    let left = img.get_pixel(area.x + 1, y);
    let right = img.get_pixel(area.x + area.width - 2, y);
    assert_eq!(*left, Color::WHITE.to_rgba());
    assert_ne!(*right, Color::WHITE.to_rgba());
}

#[test]
fn test_all_nodata_tile_is_blank_but_framed() {
    let cell_type = CellType::user_defined(BaseCellType::Int32, 7.0);
    let tile = Tile::new(8, 8, cell_type, vec![7.0; 64]).unwrap();
    let style = ThumbnailStyle {
        show_title: false,
        ..Default::default()
    };
    let img = render_tile_figure(&tile, &style).unwrap().unwrap();
    let (w, h) = img.dimensions();
    let area = plot_area(w, h, 8, 8);

    assert_eq!(
        *img.get_pixel(area.x + area.width / 2, area.y + area.height / 2),
        Color::WHITE.to_rgba()
    );
    // frame sits one pixel outside the cells
    assert_eq!(*img.get_pixel(area.x - 1, area.y + 2), Color::BLACK.to_rgba());
}

#[test]
fn test_non_square_keeps_aspect() {
    let tile = gradient_tile(300, 100);
    let img = render_tile_figure(&tile, &ThumbnailStyle::default())
        .unwrap()
        .unwrap();
    assert_eq!(img.dimensions(), (550, 183));
}

#[test]
fn test_unknown_colormap_errors() {
    let style = ThumbnailStyle {
        colormap: ColormapSpec::Named("nope".to_string()),
        ..Default::default()
    };
    let err = render_tile_figure(&gradient_tile(8, 8), &style).unwrap_err();
    assert!(matches!(err, RasterError::InvalidColormap(_)));
}

#[test]
fn test_max_figure_constant() {
    assert!(MAX_FIGURE_PX >= 4096);
}
