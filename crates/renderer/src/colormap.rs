//! Colormaps for tile thumbnails.
//!
//! A colormap is a list of color stops over the normalized range 0-1. The
//! built-in maps follow the usual scientific ramps; custom maps can be loaded
//! from JSON:
//!
//! ```json
//! { "name": "terrain", "stops": [
//!     { "value": 0.0, "color": "#1a9850" },
//!     { "value": 1.0, "color": "#ffffff" } ] }
//! ```

use raster_common::{RasterError, RasterResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of entries in a precomputed lookup table.
///
/// Kept below 256 so a thumbnail (ramp + background + frame + title) still
/// fits an indexed PNG palette.
pub const LUT_SIZE: usize = 240;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Color stop for a ramp
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: String,
}

impl ColorStop {
    pub fn new(value: f32, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }
}

/// A named color ramp over the normalized range 0-1.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Colormap {
    pub name: String,
    pub stops: Vec<ColorStop>,
}

const VIRIDIS: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

const MAGMA: [&str; 10] = [
    "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f", "#cd4071", "#f1605d", "#fd9668",
    "#feca8d", "#fcfdbf",
];

impl Colormap {
    fn evenly_spaced(name: &str, colors: &[&str]) -> Self {
        let last = (colors.len() - 1) as f32;
        Self {
            name: name.to_string(),
            stops: colors
                .iter()
                .enumerate()
                .map(|(i, c)| ColorStop::new(i as f32 / last, *c))
                .collect(),
        }
    }

    /// Perceptually uniform blue-green-yellow ramp (the default).
    pub fn viridis() -> Self {
        Self::evenly_spaced("viridis", &VIRIDIS)
    }

    pub fn magma() -> Self {
        Self::evenly_spaced("magma", &MAGMA)
    }

    /// Black to white.
    pub fn gray() -> Self {
        Self::evenly_spaced("gray", &["#000000", "#ffffff"])
    }

    /// Look up a built-in colormap.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Some(Self::viridis()),
            "magma" => Some(Self::magma()),
            "gray" | "grey" | "greys" => Some(Self::gray()),
            _ => None,
        }
    }

    /// Parse a colormap from a JSON string.
    pub fn from_json(json: &str) -> RasterResult<Self> {
        let colormap: Self = serde_json::from_str(json)?;
        colormap.validate()?;
        Ok(colormap)
    }

    /// Load a colormap from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> RasterResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check that stops are present, parse as colors, and are ordered.
    pub fn validate(&self) -> RasterResult<()> {
        if self.stops.is_empty() {
            return Err(RasterError::InvalidColormap(format!(
                "{}: no color stops",
                self.name
            )));
        }
        for stop in &self.stops {
            if Color::from_hex(&stop.color).is_none() {
                return Err(RasterError::InvalidColormap(format!(
                    "{}: bad color '{}'",
                    self.name, stop.color
                )));
            }
        }
        if self.stops.windows(2).any(|w| w[1].value < w[0].value) {
            return Err(RasterError::InvalidColormap(format!(
                "{}: stops must be sorted by value",
                self.name
            )));
        }
        Ok(())
    }

    /// Color for a normalized value in 0-1.
    pub fn color_at(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::transparent();
        };
        let parse = |s: &ColorStop| Color::from_hex(&s.color).unwrap_or(Color::BLACK);

        if t <= first.value {
            return parse(first);
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if t <= hi.value {
                let span = hi.value - lo.value;
                if span <= f32::EPSILON {
                    return parse(hi);
                }
                return interpolate_color(parse(lo), parse(hi), (t - lo.value) / span);
            }
        }
        self.stops.last().map(parse).unwrap_or(Color::BLACK)
    }

    /// Precompute a lookup table of `LUT_SIZE` colors.
    pub fn lookup_table(&self) -> ColorLut {
        let last = (LUT_SIZE - 1) as f32;
        ColorLut {
            colors: (0..LUT_SIZE)
                .map(|i| self.color_at(i as f32 / last))
                .collect(),
        }
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::viridis()
    }
}

/// Colormap as written in configuration: a built-in name or inline stops.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColormapSpec {
    Named(String),
    Custom(Colormap),
}

impl ColormapSpec {
    pub fn resolve(&self) -> RasterResult<Colormap> {
        match self {
            ColormapSpec::Named(name) => Colormap::by_name(name)
                .ok_or_else(|| RasterError::InvalidColormap(format!("unknown colormap '{}'", name))),
            ColormapSpec::Custom(colormap) => {
                colormap.validate()?;
                Ok(colormap.clone())
            }
        }
    }
}

impl Default for ColormapSpec {
    fn default() -> Self {
        ColormapSpec::Named("viridis".to_string())
    }
}

/// Precomputed colormap.
#[derive(Debug, Clone)]
pub struct ColorLut {
    colors: Vec<Color>,
}

impl ColorLut {
    /// Color for a normalized value; out-of-range values are clamped.
    pub fn color(&self, t: f64) -> Color {
        let last = self.colors.len().saturating_sub(1);
        let idx = (t.clamp(0.0, 1.0) * last as f64).round() as usize;
        self.colors.get(idx).copied().unwrap_or(Color::transparent())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Normalize a value into 0-1 given the data range.
///
/// A flat or non-finite range maps everything to the bottom of the ramp.
pub fn normalize(value: f64, min_val: f64, max_val: f64) -> f64 {
    let range = max_val - min_val;
    if range == 0.0 || !range.is_finite() {
        return 0.0;
    }
    ((value - min_val) / range).clamp(0.0, 1.0)
}
