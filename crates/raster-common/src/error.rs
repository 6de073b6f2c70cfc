//! Error types for tile rendering and display.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Primary error type for tile rendering and table display.
#[derive(Debug, Error)]
pub enum RasterError {
    // === Tile Data Errors ===
    #[error("Malformed cells: expected {expected} values for {cols}x{rows}, found {actual}")]
    MalformedCells {
        cols: usize,
        rows: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid tile dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Unknown cell type: {0}")]
    UnknownCellType(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    #[error("Invalid colormap: {0}")]
    InvalidColormap(String),

    // === Display Errors ===
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RasterError {
    /// Whether the error comes from the tile data itself rather than the
    /// rendering machinery.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            RasterError::MalformedCells { .. }
                | RasterError::InvalidDimensions(_)
                | RasterError::UnknownCellType(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        RasterError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for RasterError {
    fn from(err: serde_json::Error) -> Self {
        RasterError::ConfigError(format!("JSON error: {}", err))
    }
}
