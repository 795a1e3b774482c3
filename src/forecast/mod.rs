//! Forecasting pipeline
//!
//! One column is reshaped by [`df_for_forecast`], fit and extended by
//! [`fit_and_forecast`]; [`forecast_all`] does this for every series of a
//! frame plus their total and assembles the result tables.

pub mod adapter;
pub mod batch;
pub mod metrics;
pub mod model;
mod numeric;
pub mod single;

pub use self::adapter::{df_for_forecast, DS, Y};
pub use self::batch::{
    forecast_all, forecast_all_with, BatchForecast, ForecastCollection, SeriesForecast,
    WrittenFiles, DATE, LOWER_ESTIMATE, REV_FORECAST, TOTAL, UPPER_ESTIMATE,
};
pub use self::metrics::ForecastMetrics;
pub use self::model::{
    Forecaster, SeasonalTrendModel, ADDITIVE_TERMS, MULTIPLICATIVE_TERMS, TREND, YEARLY, YHAT,
    YHAT_LOWER, YHAT_UPPER,
};
pub use self::single::{fit_and_forecast, fit_and_forecast_with};
