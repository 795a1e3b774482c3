use log::warn;

use crate::error::{Error, Result};
use crate::DataFrame;

/// Timestamp field of an adapted series
pub const DS: &str = "ds";
/// Value field of an adapted series
pub const Y: &str = "y";

/// Reshape one column of a datetime-indexed frame into the `{ds, y}` form
/// expected by [`Forecaster::fit`](crate::forecast::Forecaster::fit)
///
/// Rows are kept as-is and in order, without resampling or gap filling.
/// Out-of-order timestamps are passed through with a warning.
pub fn df_for_forecast(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let values = df.f64_column(column).map_err(|e| match e {
        Error::ColumnNotFound(name) => Error::InvalidColumn(name),
        Error::ColumnTypeMismatch { name, .. } => {
            Error::InvalidColumn(format!("{} is not a numeric series", name))
        }
        other => other,
    })?;
    let index = df
        .datetime_index()
        .ok_or_else(|| Error::Format("input frame is not indexed by timestamp".to_string()))?;
    if !index.is_strictly_increasing() {
        warn!("{}: timestamps are not strictly increasing", column);
    }

    let mut adapted = DataFrame::new();
    adapted.add_column(DS, index.values().to_vec())?;
    adapted.add_column(Y, values.to_vec())?;
    Ok(adapted)
}
