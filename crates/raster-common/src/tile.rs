//! In-memory raster tile.

use crate::{CellType, RasterError, RasterResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raster tile: a grid of numeric cells plus its cell type.
///
/// Cells are stored in row-major order (row 0 first). A tile may carry no
/// cells at all, in which case it has dimensions but nothing to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Number of columns (width)
    pub cols: usize,
    /// Number of rows (height)
    pub rows: usize,
    /// Cell encoding and no-data policy
    #[serde(default)]
    pub cell_type: CellType,
    /// Cell values, row-major. `None` when the tile has no data.
    #[serde(default)]
    pub cells: Option<Vec<f64>>,
}

impl Tile {
    /// Create a tile, checking that the cell count matches the dimensions.
    pub fn new(cols: usize, rows: usize, cell_type: CellType, cells: Vec<f64>) -> RasterResult<Self> {
        let tile = Self {
            cols,
            rows,
            cell_type,
            cells: Some(cells),
        };
        tile.validate()?;
        Ok(tile)
    }

    /// Create a tile that carries dimensions but no cell data.
    pub fn without_cells(cols: usize, rows: usize, cell_type: CellType) -> Self {
        Self {
            cols,
            rows,
            cell_type,
            cells: None,
        }
    }

    /// Build a tile from nested rows (`rows[y][x]`).
    pub fn from_rows(rows: &[Vec<f64>], cell_type: CellType) -> RasterResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(RasterError::InvalidDimensions(format!(
                "row {} has {} values, expected {}",
                bad,
                rows[bad].len(),
                width
            )));
        }
        let cells = rows.iter().flatten().copied().collect();
        Self::new(width, height, cell_type, cells)
    }

    /// `[width, height]` of the tile.
    pub fn dimensions(&self) -> [usize; 2] {
        [self.cols, self.rows]
    }

    /// Cell values when present and non-empty.
    pub fn cell_data(&self) -> Option<&[f64]> {
        match &self.cells {
            Some(cells) if !cells.is_empty() => Some(cells.as_slice()),
            _ => None,
        }
    }

    /// Whether the tile has something to draw.
    pub fn has_cells(&self) -> bool {
        self.cell_data().is_some()
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        self.cell_data()
            .and_then(|cells| cells.get(y * self.cols + x))
            .copied()
    }

    /// Check that the cell count agrees with the dimensions.
    pub fn validate(&self) -> RasterResult<()> {
        let Some(cells) = self.cell_data() else {
            return Ok(());
        };
        if self.cols == 0 || self.rows == 0 {
            return Err(RasterError::InvalidDimensions(format!(
                "{}x{} tile cannot hold {} cells",
                self.cols,
                self.rows,
                cells.len()
            )));
        }
        let expected = self.cols.checked_mul(self.rows).ok_or_else(|| {
            RasterError::InvalidDimensions(format!(
                "{}x{} tile is too large to address",
                self.cols, self.rows
            ))
        })?;
        if cells.len() != expected {
            return Err(RasterError::MalformedCells {
                cols: self.cols,
                rows: self.rows,
                expected,
                actual: cells.len(),
            });
        }
        Ok(())
    }

    /// Range of data values, skipping no-data cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let cells = self.cell_data()?;
        let ct = self.cell_type;
        cells
            .iter()
            .copied()
            .filter(|v| !ct.is_no_data(*v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Compact single-line representation.
    pub fn repr(&self) -> String {
        let cells = if self.has_cells() { "..." } else { "none" };
        format!(
            "Tile(dimensions=[{}, {}], cell_type={}, cells={})",
            self.cols,
            self.rows,
            self.cell_type.repr(),
            cells
        )
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
