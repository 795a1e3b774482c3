use log::{debug, info};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::forecast::adapter::{df_for_forecast, DS};
use crate::forecast::model::{Forecaster, SeasonalTrendModel};
use crate::temporal::{infer_spacing, Frequency};
use crate::DataFrame;

/// Fit the built-in model to one column and forecast `config.periods` steps ahead
///
/// The returned table covers every historical timestamp followed by the
/// forecast horizon.
pub fn fit_and_forecast(
    df: &DataFrame,
    column: &str,
    config: &ForecastConfig,
) -> Result<(SeasonalTrendModel, DataFrame)> {
    fit_and_forecast_with::<SeasonalTrendModel>(df, column, config)
}

/// [`fit_and_forecast`] with any [`Forecaster`] implementation
pub fn fit_and_forecast_with<M: Forecaster>(
    df: &DataFrame,
    column: &str,
    config: &ForecastConfig,
) -> Result<(M, DataFrame)> {
    config.validate()?;

    let history = df_for_forecast(df, column)?;
    check_frequency(history.datetime_column(DS)?, config.freq)?;

    let mut model = M::from_config(config);
    model.fit(&history)?;
    debug!("{}: fitted {} model", column, model.name());

    let future = model.make_future_dataframe(config.periods, config.freq, true)?;
    let forecast = model.predict(&future)?;
    info!(
        "{}: forecast {} periods at {} ({} rows)",
        column,
        config.periods,
        config.freq,
        forecast.row_count()
    );

    Ok((model, forecast))
}

/// Reject a horizon frequency more than twice as fine as the history's spacing
fn check_frequency(dates: &[chrono::NaiveDateTime], freq: Frequency) -> Result<()> {
    if dates.len() < 2 {
        return Ok(());
    }
    let spacing = infer_spacing(dates)?;
    if freq.nominal_seconds() * 2 < spacing {
        return Err(Error::ConfigError(format!(
            "frequency {} is incompatible with history spaced {} seconds apart",
            freq, spacing
        )));
    }
    Ok(())
}
