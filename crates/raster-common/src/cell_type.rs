//! Cell type descriptors for tile data.
//!
//! A cell type combines the numeric encoding of the cells with a no-data
//! policy, and uses the conventional compact names:
//!
//! - `uint8` - default no-data value for the encoding (0 for unsigned)
//! - `uint8raw` - no no-data value at all
//! - `int16ud-9999` - user defined no-data value

use crate::error::RasterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric encoding of a tile's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseCellType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    Float32,
    Float64,
}

impl BaseCellType {
    pub const ALL: [BaseCellType; 8] = [
        BaseCellType::Bool,
        BaseCellType::Int8,
        BaseCellType::UInt8,
        BaseCellType::Int16,
        BaseCellType::UInt16,
        BaseCellType::Int32,
        BaseCellType::Float32,
        BaseCellType::Float64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BaseCellType::Bool => "bool",
            BaseCellType::Int8 => "int8",
            BaseCellType::UInt8 => "uint8",
            BaseCellType::Int16 => "int16",
            BaseCellType::UInt16 => "uint16",
            BaseCellType::Int32 => "int32",
            BaseCellType::Float32 => "float32",
            BaseCellType::Float64 => "float64",
        }
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, BaseCellType::Float32 | BaseCellType::Float64)
    }

    /// The no-data value used when the cell type carries the default policy.
    ///
    /// Booleans have no room for a sentinel.
    pub fn default_no_data(&self) -> Option<f64> {
        match self {
            BaseCellType::Bool => None,
            BaseCellType::Int8 => Some(i8::MIN as f64),
            BaseCellType::UInt8 | BaseCellType::UInt16 => Some(0.0),
            BaseCellType::Int16 => Some(i16::MIN as f64),
            BaseCellType::Int32 => Some(i32::MIN as f64),
            BaseCellType::Float32 | BaseCellType::Float64 => Some(f64::NAN),
        }
    }
}

/// No-data policy of a cell type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoData {
    /// Sentinel chosen by the encoding.
    Default,
    /// Every value is data.
    Raw,
    /// Caller-chosen sentinel.
    UserDefined(f64),
}

/// Describes how a tile's cell values are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellType {
    pub base: BaseCellType,
    pub no_data: NoData,
}

impl CellType {
    pub fn new(base: BaseCellType, no_data: NoData) -> Self {
        Self { base, no_data }
    }

    pub fn with_default_no_data(base: BaseCellType) -> Self {
        Self::new(base, NoData::Default)
    }

    pub fn raw(base: BaseCellType) -> Self {
        Self::new(base, NoData::Raw)
    }

    pub fn user_defined(base: BaseCellType, value: f64) -> Self {
        Self::new(base, NoData::UserDefined(value))
    }

    pub fn float64() -> Self {
        Self::with_default_no_data(BaseCellType::Float64)
    }

    /// Effective no-data value, if any.
    pub fn no_data_value(&self) -> Option<f64> {
        match self.no_data {
            NoData::Default => self.base.default_no_data(),
            NoData::Raw => None,
            NoData::UserDefined(v) => Some(v),
        }
    }

    /// Whether a cell value should be treated as missing.
    ///
    /// NaN is always missing, whatever the policy.
    pub fn is_no_data(&self, value: f64) -> bool {
        if value.is_nan() {
            return true;
        }
        match self.no_data_value() {
            Some(nd) if !nd.is_nan() => value == nd,
            _ => false,
        }
    }

    /// Compact representation used as inline metadata, e.g.
    /// `CellType(float64, nan)` or `CellType(uint8, none)`.
    pub fn repr(&self) -> String {
        let no_data = match self.no_data_value() {
            None => "none".to_string(),
            Some(v) if v.is_nan() => "nan".to_string(),
            Some(v) => format_number(v),
        };
        format!("CellType({}, {})", self.base.name(), no_data)
    }
}

impl Default for CellType {
    fn default() -> Self {
        Self::float64()
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.no_data {
            NoData::Default => write!(f, "{}", self.base.name()),
            NoData::Raw => write!(f, "{}raw", self.base.name()),
            NoData::UserDefined(v) => write!(f, "{}ud{}", self.base.name(), format_number(v)),
        }
    }
}

impl FromStr for CellType {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();

        for base in BaseCellType::ALL {
            let Some(rest) = name.strip_prefix(base.name()) else {
                continue;
            };
            let no_data = if rest.is_empty() {
                NoData::Default
            } else if rest == "raw" {
                NoData::Raw
            } else if let Some(value) = rest.strip_prefix("ud") {
                let v: f64 = value
                    .parse()
                    .map_err(|_| RasterError::UnknownCellType(s.to_string()))?;
                NoData::UserDefined(v)
            } else {
                continue;
            };
            if base == BaseCellType::Bool && matches!(no_data, NoData::UserDefined(_)) {
                return Err(RasterError::UnknownCellType(s.to_string()));
            }
            return Ok(CellType::new(base, no_data));
        }

        Err(RasterError::UnknownCellType(s.to_string()))
    }
}

impl TryFrom<String> for CellType {
    type Error = RasterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellType> for String {
    fn from(value: CellType) -> Self {
        value.to_string()
    }
}
