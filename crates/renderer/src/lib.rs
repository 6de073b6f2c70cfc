//! Image rendering for tile thumbnails.
//!
//! - Colormaps (color ramps from JSON stops, precomputed lookup tables)
//! - Title text from a bundled TrueType font
//! - Thumbnail figure composition (equal aspect, framed, titled)
//! - PNG encoding (indexed or RGBA)

pub mod colormap;
pub mod figure;
pub mod png;
pub mod text;

pub use colormap::{Color, ColorLut, ColorStop, Colormap, ColormapSpec};
pub use figure::{render_tile_figure, thumbnail_title, ThumbnailStyle};
