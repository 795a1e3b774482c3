//! Column selection and row-wise reductions

use crate::dataframe::base::DataFrame;
use crate::error::{Error, Result};
use crate::index::Index;

impl DataFrame {
    /// New frame holding the listed columns, each renamed `from -> to`
    ///
    /// The row index is carried over unchanged.
    pub fn select(&self, columns: &[(&str, &str)]) -> Result<DataFrame> {
        let mut result = match self.index() {
            Index::Datetime(index) => DataFrame::with_index(index.clone()),
            Index::Range(_) => DataFrame::new(),
        };

        for (from, to) in columns {
            let column = self.column(from)?.clone();
            result.add_column(*to, column)?;
        }

        Ok(result)
    }

    /// Row-wise sum over every Float64 column
    ///
    /// DateTime columns are skipped. A frame with no numeric columns yields zeros.
    pub fn row_sum(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.row_count()];
        for (_, column) in self.iter_columns() {
            if let Some(values) = column.as_f64() {
                for (sum, value) in sums.iter_mut().zip(values) {
                    *sum += value;
                }
            }
        }
        sums
    }

    /// Append a Float64 column holding the row-wise sum of the existing numeric columns
    pub fn with_row_sum(mut self, name: &str) -> Result<DataFrame> {
        if self.contains_column(name) {
            return Err(Error::DuplicateColumnName(name.to_string()));
        }
        let sums = self.row_sum();
        self.add_column(name, sums)?;
        Ok(self)
    }
}
