//! Title text rendering with the bundled DejaVu Sans Mono font.

use crate::colormap::Color;
use image::RgbaImage;
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Parse the bundled font. `None` if the asset is unreadable.
pub fn load_font() -> Option<Font<'static>> {
    Font::try_from_bytes(FONT_DATA)
}

/// Width and height in pixels of `text` drawn at `px` pixels tall.
pub fn text_size(font: &Font<'_>, text: &str, px: f32) -> (u32, u32) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    let height = v_metrics.ascent - v_metrics.descent;
    (width.ceil().max(0.0) as u32, height.ceil().max(0.0) as u32)
}

/// Draw `text` with its top-left corner at (`x`, `y`).
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    text: &str,
    x: i32,
    y: i32,
    px: f32,
    color: Color,
) {
    draw_text_mut(img, color.to_rgba(), x, y, Scale::uniform(px), font, text);
}
