//! Forecasting every series of a frame plus their total

use chrono::NaiveDateTime;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::column::Column;
use crate::config::{BatchConfig, OutputConfig};
use crate::error::{Error, Result};
use crate::forecast::adapter::DS;
use crate::forecast::model::{Forecaster, SeasonalTrendModel, YHAT, YHAT_LOWER, YHAT_UPPER};
use crate::forecast::single::fit_and_forecast_with;
use crate::index::DatetimeIndex;
use crate::io::write_csv;
use crate::DataFrame;

/// Name of the derived aggregate series
pub const TOTAL: &str = "total";
/// Index name of the per-series table
pub const DATE: &str = "date";

/// Point forecast column of the total table
pub const REV_FORECAST: &str = "rev_forecast";
/// Upper interval bound column of the total table
pub const UPPER_ESTIMATE: &str = "upper_estimate";
/// Lower interval bound column of the total table
pub const LOWER_ESTIMATE: &str = "lower_estimate";

/// Fitted model and forecast table for one named series
#[derive(Debug, Clone)]
pub struct SeriesForecast<M> {
    pub name: String,
    pub model: M,
    pub forecast: DataFrame,
}

/// Per-series results in processing order
#[derive(Debug, Clone)]
pub struct ForecastCollection<M> {
    entries: Vec<SeriesForecast<M>>,
}

impl<M> ForecastCollection<M> {
    fn new() -> Self {
        ForecastCollection {
            entries: Vec::new(),
        }
    }

    fn push(&mut self, entry: SeriesForecast<M>) {
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&SeriesForecast<M>> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn model(&self, name: &str) -> Option<&M> {
        self.get(name).map(|e| &e.model)
    }

    pub fn forecast(&self, name: &str) -> Option<&DataFrame> {
        self.get(name).map(|e| &e.forecast)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesForecast<M>> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Paths written by a persisted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub tot: PathBuf,
    pub by_series: PathBuf,
}

/// Outcome of [`forecast_all`]
#[derive(Debug, Clone)]
pub struct BatchForecast<M = SeasonalTrendModel> {
    /// Series names in processing order, `total` included
    pub names: Vec<String>,
    pub collection: ForecastCollection<M>,
    /// `date, rev_forecast, upper_estimate, lower_estimate` for the total
    pub total_forecast: DataFrame,
    /// Point forecast of every series, indexed by the total's timestamps
    pub by_series: DataFrame,
    /// Set when results were persisted
    pub written: Option<WrittenFiles>,
}

/// Forecast every numeric column of `df` and the total across them
///
/// A `total` column is derived as the row-wise sum when absent. Any failure
/// aborts the whole run and nothing is written.
pub fn forecast_all(df: &DataFrame, config: &BatchConfig) -> Result<BatchForecast> {
    forecast_all_with::<SeasonalTrendModel>(df, config)
}

/// [`forecast_all`] with any [`Forecaster`] implementation
pub fn forecast_all_with<M: Forecaster>(
    df: &DataFrame,
    config: &BatchConfig,
) -> Result<BatchForecast<M>> {
    config.validate()?;

    let has_series = df
        .iter_columns()
        .any(|(_, column)| matches!(column, Column::Float64(_)));
    if !has_series {
        return Err(Error::EmptyData(
            "frame has no numeric series to forecast".to_string(),
        ));
    }

    let working = if df.contains_column(TOTAL) {
        df.clone()
    } else {
        debug!("deriving {} as the row-wise sum", TOTAL);
        df.clone().with_row_sum(TOTAL)?
    };

    let names: Vec<String> = working
        .iter_columns()
        .filter(|(_, column)| matches!(column, Column::Float64(_)))
        .map(|(name, _)| name.to_string())
        .collect();
    info!("forecasting {} series: {}", names.len(), names.join(", "));

    let mut collection = ForecastCollection::new();
    for name in &names {
        let (model, forecast) = fit_and_forecast_with::<M>(&working, name, &config.forecast)?;
        collection.push(SeriesForecast {
            name: name.clone(),
            model,
            forecast,
        });
    }

    let total = collection
        .forecast(TOTAL)
        .ok_or_else(|| Error::InvalidColumn(format!("{} is not a numeric series", TOTAL)))?;
    let total_forecast = total.select(&[
        (DS, DATE),
        (YHAT, REV_FORECAST),
        (YHAT_UPPER, UPPER_ESTIMATE),
        (YHAT_LOWER, LOWER_ESTIMATE),
    ])?;
    let by_series = point_forecasts(&collection, total.datetime_column(DS)?)?;

    let written = if config.output.enabled {
        Some(persist(&total_forecast, &by_series, &config.output)?)
    } else {
        None
    };

    Ok(BatchForecast {
        names,
        collection,
        total_forecast,
        by_series,
        written,
    })
}

/// Align each series' `yhat` onto `dates`; timestamps a series lacks become NaN
fn point_forecasts<M>(
    collection: &ForecastCollection<M>,
    dates: &[NaiveDateTime],
) -> Result<DataFrame> {
    let mut table = DataFrame::with_index(DatetimeIndex::with_name(
        dates.to_vec(),
        Some(DATE.to_string()),
    ));

    for entry in collection.iter() {
        let ds = entry.forecast.datetime_column(DS)?;
        let yhat = entry.forecast.f64_column(YHAT)?;
        let by_date: HashMap<&NaiveDateTime, f64> = ds.iter().zip(yhat.iter().copied()).collect();
        let aligned: Vec<f64> = dates
            .iter()
            .map(|dt| by_date.get(dt).copied().unwrap_or(f64::NAN))
            .collect();
        table.add_column(entry.name.as_str(), aligned)?;
    }

    Ok(table)
}

fn persist(
    total_forecast: &DataFrame,
    by_series: &DataFrame,
    output: &OutputConfig,
) -> Result<WrittenFiles> {
    fs::create_dir_all(&output.dir)?;

    let tot = output.tot_path();
    write_csv(total_forecast, &tot, false)?;
    info!("wrote total forecast to {}", tot.display());

    let by_series_path = output.by_series_path();
    write_csv(by_series, &by_series_path, true)?;
    info!("wrote per-series forecasts to {}", by_series_path.display());

    Ok(WrittenFiles {
        tot,
        by_series: by_series_path,
    })
}
