//! Typed column storage for DataFrame

use chrono::NaiveDateTime;

/// Column data type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float64,
    DateTime,
}

/// A single column of homogeneous values
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float64(Vec<f64>),
    DateTime(Vec<NaiveDateTime>),
}

impl Column {
    /// Number of values in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Float64(values) => values.len(),
            Column::DateTime(values) => values.len(),
        }
    }

    /// Whether the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type tag of the column
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Float64(_) => ColumnType::Float64,
            Column::DateTime(_) => ColumnType::DateTime,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Column::Float64(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&[NaiveDateTime]> {
        match self {
            Column::DateTime(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float64(values)
    }
}

impl From<Vec<NaiveDateTime>> for Column {
    fn from(values: Vec<NaiveDateTime>) -> Self {
        Column::DateTime(values)
    }
}
