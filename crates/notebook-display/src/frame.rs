//! Minimal in-memory table of named columns.
//!
//! Only what display needs: ordered columns of loosely typed values, a
//! single-line repr per value, HTML and plain-text renderings.

use crate::html::HtmlOptions;
use crate::options::DisplayOptions;
use raster_common::{RasterError, RasterResult, Tile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Tile(Arc<Tile>),
}

impl Value {
    pub fn as_tile(&self) -> Option<&Tile> {
        match self {
            Value::Tile(tile) => Some(tile),
            _ => None,
        }
    }

    pub fn is_tile(&self) -> bool {
        matches!(self, Value::Tile(_))
    }

    /// Single-line text shown for the value in tables.
    pub fn repr(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.is_nan() => "NaN".to_string(),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Tile(tile) => tile.repr(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl From<Tile> for Value {
    fn from(tile: Tile) -> Self {
        Value::Tile(Arc::new(tile))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered columns sharing one row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Build a frame, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> RasterResult<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(RasterError::ColumnLength {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// A frame with the given column names and no rows.
    pub fn empty<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: names
                .into_iter()
                .map(|name| Column {
                    name: name.into(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> RasterResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| RasterError::UnknownColumn(name.to_string()))
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Render as an HTML table.
    pub fn to_html(&self, options: &HtmlOptions<'_>) -> RasterResult<String> {
        crate::html::to_html(self, options)
    }

    /// The frame's default notebook HTML: escaped cell reprs under the
    /// current row/column limits. `None` when HTML output is disabled.
    pub fn repr_html(&self, options: &DisplayOptions) -> RasterResult<Option<String>> {
        if !options.notebook_repr_html {
            return Ok(None);
        }
        let html_options = HtmlOptions {
            notebook: true,
            ..HtmlOptions::from_display(options)
        };
        self.to_html(&html_options).map(Some)
    }
}

impl fmt::Display for DataFrame {
    /// Plain-text table: index column, then one right-aligned column per
    /// frame column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return write!(f, "Empty DataFrame\nColumns: []\nIndex: []");
        }
        if self.is_empty() {
            let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
            return write!(f, "Empty DataFrame\nColumns: [{}]\nIndex: []", names.join(", "));
        }

        let rows = self.num_rows();
        let index_width = (rows - 1).to_string().len();
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values.iter().map(Value::repr).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, vals)| {
                vals.iter()
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:width$}", "", width = index_width)?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", column.name, width = width)?;
        }
        for row in 0..rows {
            write!(f, "\n{:<width$}", row, width = index_width)?;
            for (vals, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", vals[row], width = width)?;
            }
        }
        Ok(())
    }
}
