use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::index::{DatetimeIndex, Index};

/// Column-oriented table with a row index
///
/// Column order is preserved; every column has exactly `row_count()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    index: Index,
    columns: Vec<String>,
    data: HashMap<String, Column>,
}

impl DataFrame {
    /// Empty DataFrame with a positional index
    pub fn new() -> Self {
        DataFrame {
            index: Index::Range(0),
            columns: Vec::new(),
            data: HashMap::new(),
        }
    }

    /// Empty DataFrame with datetime row labels; columns added later must match its length
    pub fn with_index(index: DatetimeIndex) -> Self {
        DataFrame {
            index: Index::Datetime(index),
            columns: Vec::new(),
            data: HashMap::new(),
        }
    }

    /// Add a column at the end
    pub fn add_column<C: Into<Column>>(&mut self, name: impl Into<String>, column: C) -> Result<()> {
        let name = name.into();
        let column = column.into();

        if self.data.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }

        if self.columns.is_empty() && self.index == Index::Range(0) {
            self.index = Index::Range(column.len());
        } else if column.len() != self.row_count() {
            return Err(Error::LengthMismatch {
                expected: self.row_count(),
                actual: column.len(),
            });
        }

        self.columns.push(name.clone());
        self.data.insert(name, column);
        Ok(())
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Datetime row labels, if the frame has them
    pub fn datetime_index(&self) -> Option<&DatetimeIndex> {
        self.index.as_datetime()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.data
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn f64_column(&self, name: &str) -> Result<&[f64]> {
        let column = self.column(name)?;
        column.as_f64().ok_or_else(|| Error::ColumnTypeMismatch {
            name: name.to_string(),
            expected: ColumnType::Float64,
            found: column.column_type(),
        })
    }

    pub fn datetime_column(&self, name: &str) -> Result<&[NaiveDateTime]> {
        let column = self.column(name)?;
        column.as_datetime().ok_or_else(|| Error::ColumnTypeMismatch {
            name: name.to_string(),
            expected: ColumnType::DateTime,
            found: column.column_type(),
        })
    }

    /// Iterate over `(name, column)` pairs in column order
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.columns
            .iter()
            .map(move |name| (name.as_str(), &self.data[name]))
    }

    /// Move a DateTime column into the row index
    pub fn set_index(mut self, name: &str) -> Result<Self> {
        let values = self.datetime_column(name)?.to_vec();
        self.data.remove(name);
        self.columns.retain(|c| c != name);
        self.index = Index::Datetime(DatetimeIndex::with_name(values, Some(name.to_string())));
        Ok(self)
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}
