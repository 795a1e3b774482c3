use thiserror::Error;

use crate::column::ColumnType;

/// Error type for the forecasting pipeline and its tabular substrate
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid column: {0}")]
    InvalidColumn(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("fit error: {0}")]
    FitError(String),

    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("non-finite value at row {index}")]
    NonFiniteValue { index: usize },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("column type mismatch: column {name}, expected {expected:?}, found {found:?}")]
    ColumnTypeMismatch {
        name: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("empty data: {0}")]
    EmptyData(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("visualization error: {0}")]
    Visualization(String),

    #[error("io error: {0}")]
    Io(#[source] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[source] csv::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for every failure raised while fitting a model to a series
    pub fn is_fit_error(&self) -> bool {
        matches!(
            self,
            Error::FitError(_) | Error::InsufficientData { .. } | Error::NonFiniteValue { .. }
        )
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("json: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("yaml: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(format!("toml: {}", err))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(format!("toml: {}", err))
    }
}

#[cfg(feature = "visualization")]
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Visualization(format!("drawing failed: {}", err))
    }
}
