//! Tile generators with predictable cell values.
//!
//! These generators create verifiable patterns that can be used across the
//! test suite.

use raster_common::{BaseCellType, CellType, Tile};

/// Creates a tile whose cells encode their position.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::indexed_tile;
///
/// let tile = indexed_tile(10, 5);
/// assert_eq!(tile.dimensions(), [10, 5]);
/// assert_eq!(tile.get(1, 0), Some(1000.0));
/// assert_eq!(tile.get(0, 1), Some(1.0));
/// ```
pub fn indexed_tile(cols: usize, rows: usize) -> Tile {
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            cells.push((col * 1000 + row) as f64);
        }
    }
    Tile {
        cols,
        rows,
        cell_type: CellType::float64(),
        cells: Some(cells),
    }
}

/// Creates a float64 tile with a diagonal gradient from 0 (top-left) to 1
/// (bottom-right).
pub fn gradient_tile(cols: usize, rows: usize) -> Tile {
    let span = (cols + rows).saturating_sub(2).max(1) as f64;
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            cells.push((col + row) as f64 / span);
        }
    }
    Tile {
        cols,
        rows,
        cell_type: CellType::float64(),
        cells: Some(cells),
    }
}

/// Creates a uint8 checkerboard of 0/255 with raw cell type (no masking).
pub fn checkerboard_tile(cols: usize, rows: usize) -> Tile {
    let cells = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| if (row + col) % 2 == 0 { 0.0 } else { 255.0 }))
        .collect();
    Tile {
        cols,
        rows,
        cell_type: CellType::raw(BaseCellType::UInt8),
        cells: Some(cells),
    }
}

/// Creates an int16 tile where the left half is the no-data value `-9999`.
pub fn half_nodata_tile(cols: usize, rows: usize) -> Tile {
    let no_data = -9999.0;
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            if col < cols / 2 {
                cells.push(no_data);
            } else {
                cells.push((row * cols + col) as f64);
            }
        }
    }
    Tile {
        cols,
        rows,
        cell_type: CellType::user_defined(BaseCellType::Int16, no_data),
        cells: Some(cells),
    }
}

/// Creates a tile with dimensions but no cell data.
pub fn empty_tile(cols: usize, rows: usize) -> Tile {
    Tile::without_cells(cols, rows, CellType::float64())
}

/// Creates a tile whose cell count disagrees with its dimensions.
pub fn malformed_tile() -> Tile {
    Tile {
        cols: 4,
        rows: 4,
        cell_type: CellType::float64(),
        cells: Some(vec![1.0, 2.0, 3.0]),
    }
}
