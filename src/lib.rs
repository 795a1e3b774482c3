#![allow(clippy::needless_return)]
#![allow(clippy::too_many_arguments)]

pub mod column;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod forecast;
pub mod index;
pub mod io;
pub mod temporal;
pub mod vis;

// Re-export commonly used types
pub use column::{Column, ColumnType};
pub use config::{BatchConfig, ForecastConfig, OutputConfig, SeasonalityMode};
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use forecast::{
    df_for_forecast, fit_and_forecast, fit_and_forecast_with, forecast_all, forecast_all_with,
    BatchForecast, ForecastCollection, ForecastMetrics, Forecaster, SeasonalTrendModel,
};
pub use index::{DatetimeIndex, Index};
pub use io::{read_csv, write_csv};
pub use temporal::{date_range, Frequency};
pub use vis::{season_compare, Color, Figure, Palette};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
