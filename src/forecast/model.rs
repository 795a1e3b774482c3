//! Forecasting models
//!
//! [`Forecaster`] is the seam between the pipeline and the model doing the
//! actual decomposition. [`SeasonalTrendModel`] is the built-in implementation:
//! a linear trend with Fourier yearly seasonality, fit by least squares with a
//! ridge prior on the seasonal coefficients.

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::config::{ForecastConfig, SeasonalityMode};
use crate::error::{Error, Result};
use crate::forecast::adapter::{DS, Y};
use crate::forecast::metrics::ForecastMetrics;
use crate::forecast::numeric::{dot, fourier_series, ols_line, quantile_normal, ridge, YEAR_DAYS};
use crate::temporal::{extend_after, Frequency};
use crate::DataFrame;

pub const TREND: &str = "trend";
pub const YHAT_LOWER: &str = "yhat_lower";
pub const YHAT_UPPER: &str = "yhat_upper";
pub const YEARLY: &str = "yearly";
pub const ADDITIVE_TERMS: &str = "additive_terms";
pub const MULTIPLICATIVE_TERMS: &str = "multiplicative_terms";
pub const YHAT: &str = "yhat";

/// Minimum number of observations a fit accepts
pub const MIN_OBSERVATIONS: usize = 2;

const SECONDS_PER_DAY: f64 = 86_400.0;
const MULTIPLICATIVE_ITERATIONS: usize = 25;

/// A model that can be fit to one `{ds, y}` series and then predict over any timestamps
pub trait Forecaster {
    /// Build an unfitted model from shared settings
    fn from_config(config: &ForecastConfig) -> Self
    where
        Self: Sized;

    /// Fit to a `{ds, y}` frame
    fn fit(&mut self, history: &DataFrame) -> Result<()>;

    /// `{ds}` frame with `periods` steps at `freq` after the last fitted timestamp,
    /// optionally preceded by the historical timestamps
    fn make_future_dataframe(
        &self,
        periods: usize,
        freq: Frequency,
        include_history: bool,
    ) -> Result<DataFrame>;

    /// Forecast table for every timestamp in a `{ds}` frame
    fn predict(&self, future: &DataFrame) -> Result<DataFrame>;

    /// Yearly seasonal component at the given timestamps
    fn yearly_component(&self, dates: &[NaiveDateTime]) -> Result<Vec<f64>>;

    /// In-sample fit metrics
    fn fit_metrics(&self) -> Result<ForecastMetrics>;

    fn name(&self) -> &str;
}

/// Parameters learned by [`SeasonalTrendModel::fit`]
#[derive(Debug, Clone, PartialEq)]
struct FittedParams {
    history_ds: Vec<NaiveDateTime>,
    history_y: Vec<f64>,
    start: NaiveDateTime,
    last: NaiveDateTime,
    span_seconds: f64,
    y_scale: f64,
    slope: f64,
    intercept: f64,
    beta: Vec<f64>,
    sigma: f64,
}

/// Linear trend with yearly Fourier seasonality
///
/// Values are scaled by their largest magnitude and time by the history span,
/// so the trend is fit on the unit interval. Seasonal coefficients carry a
/// ridge penalty of `1 / prior_scale^2`. Intervals assume normal residuals and
/// widen with the distance past the end of the history.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalTrendModel {
    mode: SeasonalityMode,
    yearly_order: usize,
    seasonality_prior_scale: f64,
    interval_width: f64,
    fitted: Option<FittedParams>,
}

impl SeasonalTrendModel {
    pub fn new(config: &ForecastConfig) -> Self {
        SeasonalTrendModel {
            mode: config.mode,
            yearly_order: config.yearly_order,
            seasonality_prior_scale: config.seasonality_prior_scale,
            interval_width: config.interval_width,
            fitted: None,
        }
    }

    pub fn mode(&self) -> SeasonalityMode {
        self.mode
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Residual standard deviation on the scaled value axis
    pub fn sigma(&self) -> Option<f64> {
        self.fitted.as_ref().map(|p| p.sigma)
    }

    fn params(&self) -> Result<&FittedParams> {
        self.fitted
            .as_ref()
            .ok_or_else(|| Error::FitError("model must be fitted before prediction".to_string()))
    }

    fn seasonal_features(&self, dates: &[NaiveDateTime]) -> Vec<Vec<f64>> {
        let days: Vec<f64> = dates.iter().map(days_since_epoch).collect();
        fourier_series(&days, YEAR_DAYS, self.yearly_order)
    }

    /// Scaled trend and seasonal terms at the given timestamps
    fn components(&self, dates: &[NaiveDateTime]) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let params = self.params()?;
        let t: Vec<f64> = dates
            .iter()
            .map(|dt| scaled_time(dt, &params.start, params.span_seconds))
            .collect();
        let trend: Vec<f64> = t
            .iter()
            .map(|ti| params.intercept + params.slope * ti)
            .collect();
        let seasonal: Vec<f64> = if params.beta.is_empty() {
            vec![0.0; dates.len()]
        } else {
            self.seasonal_features(dates)
                .iter()
                .map(|row| dot(row, &params.beta))
                .collect()
        };
        Ok((t, trend, seasonal))
    }

    fn combine(&self, trend: f64, seasonal: f64) -> f64 {
        match self.mode {
            SeasonalityMode::Multiplicative => trend * (1.0 + seasonal),
            SeasonalityMode::Additive => trend + seasonal,
        }
    }
}

impl Forecaster for SeasonalTrendModel {
    fn from_config(config: &ForecastConfig) -> Self {
        SeasonalTrendModel::new(config)
    }

    fn fit(&mut self, history: &DataFrame) -> Result<()> {
        let ds = history.datetime_column(DS)?;
        let y = history.f64_column(Y)?;

        if y.len() < MIN_OBSERVATIONS {
            return Err(Error::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: y.len(),
            });
        }
        if let Some(index) = y.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue { index });
        }

        let start = ds.iter().min().copied().ok_or_else(|| {
            Error::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: 0,
            }
        })?;
        let last = ds.iter().max().copied().unwrap_or(start);
        let span_seconds = (last - start).num_seconds() as f64;
        if span_seconds <= 0.0 {
            return Err(Error::FitError(
                "history spans no time: all timestamps are equal".to_string(),
            ));
        }

        let y_scale = match y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())) {
            s if s > 0.0 => s,
            _ => 1.0,
        };
        let scaled: Vec<f64> = y.iter().map(|v| v / y_scale).collect();
        let t: Vec<f64> = ds
            .iter()
            .map(|dt| scaled_time(dt, &start, span_seconds))
            .collect();

        let features = self.seasonal_features(ds);
        let penalty = 1.0 / (self.seasonality_prior_scale * self.seasonality_prior_scale);
        let (slope, intercept, beta) = match self.mode {
            SeasonalityMode::Additive => fit_additive(&t, &scaled, &features, penalty)?,
            SeasonalityMode::Multiplicative => {
                fit_multiplicative(&t, &scaled, &features, penalty)?
            }
        };

        let trend: Vec<f64> = t.iter().map(|ti| intercept + slope * ti).collect();
        let seasonal: Vec<f64> = if beta.is_empty() {
            vec![0.0; ds.len()]
        } else {
            features.iter().map(|row| dot(row, &beta)).collect()
        };
        let residual_ss: f64 = scaled
            .iter()
            .zip(trend.iter().zip(&seasonal))
            .map(|(v, (tr, s))| {
                let r = v - self.combine(*tr, *s);
                r * r
            })
            .sum();
        let sigma = (residual_ss / scaled.len() as f64).sqrt();

        debug!(
            "fitted {} model on {} observations: slope={:.4}, sigma={:.6}",
            self.mode,
            y.len(),
            slope,
            sigma
        );

        self.fitted = Some(FittedParams {
            history_ds: ds.to_vec(),
            history_y: y.to_vec(),
            start,
            last,
            span_seconds,
            y_scale,
            slope,
            intercept,
            beta,
            sigma,
        });
        Ok(())
    }

    fn make_future_dataframe(
        &self,
        periods: usize,
        freq: Frequency,
        include_history: bool,
    ) -> Result<DataFrame> {
        let params = self.params()?;
        let mut dates = if include_history {
            params.history_ds.clone()
        } else {
            Vec::with_capacity(periods)
        };
        dates.extend(extend_after(params.last, periods, freq)?);

        let mut future = DataFrame::new();
        future.add_column(DS, dates)?;
        Ok(future)
    }

    fn predict(&self, future: &DataFrame) -> Result<DataFrame> {
        let params = self.params()?;
        let ds = future.datetime_column(DS)?;
        let (t, trend, seasonal) = self.components(ds)?;

        let z = quantile_normal(0.5 + self.interval_width / 2.0);
        let scale = params.y_scale;
        let n = ds.len();

        let mut trend_col = Vec::with_capacity(n);
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        let mut yearly = Vec::with_capacity(n);
        let mut additive = Vec::with_capacity(n);
        let mut multiplicative = Vec::with_capacity(n);
        let mut yhat = Vec::with_capacity(n);

        for i in 0..n {
            let point = self.combine(trend[i], seasonal[i]) * scale;
            let ahead = (t[i] - 1.0).max(0.0);
            let half_width = z * params.sigma * (1.0 + ahead).sqrt() * scale;

            trend_col.push(trend[i] * scale);
            lower.push(point - half_width);
            upper.push(point + half_width);
            match self.mode {
                SeasonalityMode::Multiplicative => {
                    yearly.push(seasonal[i]);
                    additive.push(0.0);
                    multiplicative.push(seasonal[i]);
                }
                SeasonalityMode::Additive => {
                    yearly.push(seasonal[i] * scale);
                    additive.push(seasonal[i] * scale);
                    multiplicative.push(0.0);
                }
            }
            yhat.push(point);
        }

        let mut forecast = DataFrame::new();
        forecast.add_column(DS, ds.to_vec())?;
        forecast.add_column(TREND, trend_col)?;
        forecast.add_column(YHAT_LOWER, lower)?;
        forecast.add_column(YHAT_UPPER, upper)?;
        forecast.add_column(YEARLY, yearly)?;
        forecast.add_column(ADDITIVE_TERMS, additive)?;
        forecast.add_column(MULTIPLICATIVE_TERMS, multiplicative)?;
        forecast.add_column(YHAT, yhat)?;
        Ok(forecast)
    }

    fn yearly_component(&self, dates: &[NaiveDateTime]) -> Result<Vec<f64>> {
        let params = self.params()?;
        let (_, _, seasonal) = self.components(dates)?;
        Ok(match self.mode {
            SeasonalityMode::Multiplicative => seasonal,
            SeasonalityMode::Additive => seasonal.iter().map(|s| s * params.y_scale).collect(),
        })
    }

    fn fit_metrics(&self) -> Result<ForecastMetrics> {
        let params = self.params()?;
        let (_, trend, seasonal) = self.components(&params.history_ds)?;
        let fitted: Vec<f64> = trend
            .iter()
            .zip(&seasonal)
            .map(|(tr, s)| self.combine(*tr, *s) * params.y_scale)
            .collect();
        ForecastMetrics::from_fit(&params.history_y, &fitted)
    }

    fn name(&self) -> &str {
        "Seasonal Trend"
    }
}

/// Joint least squares of `y = a + b t + F beta`, penalising only `beta`
fn fit_additive(
    t: &[f64],
    y: &[f64],
    features: &[Vec<f64>],
    penalty: f64,
) -> Result<(f64, f64, Vec<f64>)> {
    let design: Vec<Vec<f64>> = t
        .iter()
        .zip(features)
        .map(|(ti, row)| {
            let mut full = Vec::with_capacity(row.len() + 2);
            full.push(1.0);
            full.push(*ti);
            full.extend_from_slice(row);
            full
        })
        .collect();
    let mut penalties = vec![penalty; design[0].len()];
    penalties[0] = 0.0;
    penalties[1] = 0.0;

    let coef = ridge(&design, y, &penalties)?;
    Ok((coef[1], coef[0], coef[2..].to_vec()))
}

/// Fit `y = (a + b t)(1 + F beta)` by alternating least squares
///
/// Starts from the plain OLS line; each half-step solves the trend or the
/// seasonal coefficients exactly with the other held fixed.
fn fit_multiplicative(
    t: &[f64],
    y: &[f64],
    features: &[Vec<f64>],
    penalty: f64,
) -> Result<(f64, f64, Vec<f64>)> {
    let (mut slope, mut intercept) = ols_line(t, y)?;
    let order = features.first().map_or(0, |row| row.len());
    if order == 0 {
        return Ok((slope, intercept, Vec::new()));
    }

    let mut beta = vec![0.0; order];
    for _ in 0..MULTIPLICATIVE_ITERATIONS {
        let trend: Vec<f64> = t.iter().map(|ti| intercept + slope * ti).collect();
        if trend.iter().all(|tr| tr.abs() < 1e-9) {
            warn!("trend is zero everywhere; multiplicative seasonality cannot be identified");
            break;
        }

        let scaled_features: Vec<Vec<f64>> = features
            .iter()
            .zip(&trend)
            .map(|(row, tr)| row.iter().map(|x| x * tr).collect())
            .collect();
        let target: Vec<f64> = y.iter().zip(&trend).map(|(v, tr)| v - tr).collect();
        beta = ridge(&scaled_features, &target, &vec![penalty; order])?;

        let level: Vec<Vec<f64>> = t
            .iter()
            .zip(features)
            .map(|(ti, row)| {
                let u = 1.0 + dot(row, &beta);
                vec![u, ti * u]
            })
            .collect();
        let coef = ridge(&level, y, &[0.0, 0.0])?;
        intercept = coef[0];
        slope = coef[1];
    }

    Ok((slope, intercept, beta))
}

fn days_since_epoch(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}

fn scaled_time(dt: &NaiveDateTime, start: &NaiveDateTime, span_seconds: f64) -> f64 {
    (*dt - *start).num_seconds() as f64 / span_seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn monthly_history(values: &[f64]) -> DataFrame {
        let dates: Vec<NaiveDateTime> = (0..values.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2018 + (i / 12) as i32, (i % 12) as u32 + 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
            .collect();
        let mut df = DataFrame::new();
        df.add_column(DS, dates).unwrap();
        df.add_column(Y, values.to_vec()).unwrap();
        df
    }

    fn seasonal_values(months: usize, mode: SeasonalityMode) -> Vec<f64> {
        (0..months)
            .map(|i| {
                let level = 100.0 + 2.0 * i as f64;
                let season = (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin();
                match mode {
                    SeasonalityMode::Multiplicative => level * (1.0 + 0.2 * season),
                    SeasonalityMode::Additive => level + 15.0 * season,
                }
            })
            .collect()
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = SeasonalTrendModel::new(&ForecastConfig::default());
        let err = model.predict(&monthly_history(&[1.0, 2.0])).unwrap_err();
        assert!(err.is_fit_error());
        assert!(model
            .make_future_dataframe(3, Frequency::MonthStart, true)
            .is_err());
    }

    #[test]
    fn rejects_short_and_non_finite_series() {
        let mut model = SeasonalTrendModel::new(&ForecastConfig::default());
        assert!(matches!(
            model.fit(&monthly_history(&[1.0])),
            Err(Error::InsufficientData { needed: 2, got: 1 })
        ));
        assert!(matches!(
            model.fit(&monthly_history(&[1.0, f64::NAN, 3.0])),
            Err(Error::NonFiniteValue { index: 1 })
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn linear_series_is_reproduced_exactly() {
        let config = ForecastConfig::default().with_periods(2);
        let mut model = SeasonalTrendModel::new(&config);
        model.fit(&monthly_history(&[10.0, 20.0, 30.0])).unwrap();

        let future = model
            .make_future_dataframe(2, Frequency::MonthStart, true)
            .unwrap();
        let forecast = model.predict(&future).unwrap();
        let yhat = forecast.f64_column(YHAT).unwrap();
        assert_eq!(yhat.len(), 5);
        // monthly steps are uneven in days, so allow a small tolerance
        for (fitted, expected) in yhat.iter().zip([10.0, 20.0, 30.0]) {
            assert!((fitted - expected).abs() < 0.5, "{} vs {}", fitted, expected);
        }
        assert!(yhat[3] > yhat[2] && yhat[4] > yhat[3]);
    }

    #[test]
    fn recovers_additive_seasonality() {
        let values = seasonal_values(48, SeasonalityMode::Additive);
        let config = ForecastConfig::default().with_mode(SeasonalityMode::Additive);
        let mut model = SeasonalTrendModel::new(&config);
        model.fit(&monthly_history(&values)).unwrap();

        let metrics = model.fit_metrics().unwrap();
        assert!(metrics.rmse < 2.0, "rmse {}", metrics.rmse);
    }

    #[test]
    fn recovers_multiplicative_seasonality() {
        let values = seasonal_values(48, SeasonalityMode::Multiplicative);
        let mut model = SeasonalTrendModel::new(&ForecastConfig::default());
        model.fit(&monthly_history(&values)).unwrap();

        let metrics = model.fit_metrics().unwrap();
        assert!(metrics.mape.unwrap() < 2.0, "mape {:?}", metrics.mape);

        let dates = monthly_history(&values);
        let dates = dates.datetime_column(DS).unwrap();
        let yearly = model.yearly_component(&dates[..12]).unwrap();
        // April peaks (sin at a quarter year), October troughs
        let april = dates.iter().position(|d| d.month() == 4).unwrap();
        let october = dates.iter().position(|d| d.month() == 10).unwrap();
        assert!(yearly[april] > 0.1);
        assert!(yearly[october] < -0.1);
    }

    #[test]
    fn interval_contains_point_and_widens_ahead() {
        let values = seasonal_values(36, SeasonalityMode::Additive)
            .iter()
            .enumerate()
            .map(|(i, v)| v + ((i * 7919) % 13) as f64 - 6.0)
            .collect::<Vec<_>>();
        let mut model = SeasonalTrendModel::new(&ForecastConfig::default().with_yearly_order(3));
        model.fit(&monthly_history(&values)).unwrap();

        let future = model
            .make_future_dataframe(12, Frequency::MonthStart, true)
            .unwrap();
        let forecast = model.predict(&future).unwrap();
        let lower = forecast.f64_column(YHAT_LOWER).unwrap();
        let upper = forecast.f64_column(YHAT_UPPER).unwrap();
        let yhat = forecast.f64_column(YHAT).unwrap();

        for i in 0..yhat.len() {
            assert!(lower[i] <= yhat[i] && yhat[i] <= upper[i]);
        }
        let width_hist = upper[35] - lower[35];
        let width_end = upper[47] - lower[47];
        assert!(width_end > width_hist);
    }

    #[test]
    fn wider_interval_for_larger_width() {
        let values = seasonal_values(24, SeasonalityMode::Additive)
            .iter()
            .enumerate()
            .map(|(i, v)| v + (i as f64 * 1.7).sin() * 4.0)
            .collect::<Vec<_>>();
        let history = monthly_history(&values);

        let width_at = |w: f64| {
            let config = ForecastConfig::default()
                .with_yearly_order(3)
                .with_interval_width(w);
            let mut model = SeasonalTrendModel::new(&config);
            model.fit(&history).unwrap();
            let forecast = model.predict(&history).unwrap();
            let lower = forecast.f64_column(YHAT_LOWER).unwrap()[0];
            let upper = forecast.f64_column(YHAT_UPPER).unwrap()[0];
            upper - lower
        };
        assert!(width_at(0.95) > width_at(0.8));
    }
}
