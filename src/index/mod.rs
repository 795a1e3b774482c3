//! Row labels for DataFrame

use chrono::NaiveDateTime;

/// Ordered datetime row labels
///
/// No monotonicity is enforced here; callers that need a clean series are
/// responsible for supplying one.
#[derive(Debug, Clone, PartialEq)]
pub struct DatetimeIndex {
    values: Vec<NaiveDateTime>,
    name: Option<String>,
}

impl DatetimeIndex {
    pub fn new(values: Vec<NaiveDateTime>) -> Self {
        Self::with_name(values, None)
    }

    pub fn with_name(values: Vec<NaiveDateTime>, name: Option<String>) -> Self {
        DatetimeIndex { values, name }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[NaiveDateTime] {
        &self.values
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether every label is strictly later than its predecessor
    pub fn is_strictly_increasing(&self) -> bool {
        self.values.windows(2).all(|w| w[0] < w[1])
    }
}

/// Row index of a DataFrame: positional or datetime-labelled
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    Range(usize),
    Datetime(DatetimeIndex),
}

impl Index {
    pub fn len(&self) -> usize {
        match self {
            Index::Range(len) => *len,
            Index::Datetime(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_datetime(&self) -> Option<&DatetimeIndex> {
        match self {
            Index::Datetime(index) => Some(index),
            Index::Range(_) => None,
        }
    }
}

impl Default for Index {
    fn default() -> Self {
        Index::Range(0)
    }
}
