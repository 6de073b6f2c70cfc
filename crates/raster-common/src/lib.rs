//! Common types shared across the tile-display crates.

pub mod cell_type;
pub mod error;
pub mod tile;

pub use cell_type::{BaseCellType, CellType, NoData};
pub use error::{RasterError, RasterResult};
pub use tile::Tile;
