use chrono::{NaiveDate, NaiveDateTime};
use revcast::forecast::{
    ForecastMetrics, DATE, DS, LOWER_ESTIMATE, REV_FORECAST, TOTAL, UPPER_ESTIMATE, YHAT,
    YHAT_LOWER, YHAT_UPPER,
};
use revcast::temporal::extend_after;
use revcast::{
    forecast_all, forecast_all_with, read_csv, BatchConfig, DataFrame, DatetimeIndex, Error,
    ForecastConfig, Forecaster, Frequency, OutputConfig,
};
use tempfile::tempdir;

fn month_start(month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Columns A: [10, 20, 30] and B: [5, 5, 5] over three month starts
fn two_brands() -> DataFrame {
    let dates = vec![month_start(1), month_start(2), month_start(3)];
    let mut df = DataFrame::with_index(DatetimeIndex::new(dates));
    df.add_column("A", vec![10.0, 20.0, 30.0]).unwrap();
    df.add_column("B", vec![5.0, 5.0, 5.0]).unwrap();
    df
}

fn one_step() -> BatchConfig {
    BatchConfig::new(ForecastConfig::default().with_periods(1))
}

#[test]
fn test_total_is_derived_and_forecast() {
    let result = forecast_all(&two_brands(), &one_step()).unwrap();

    assert_eq!(result.names, vec!["A", "B", "total"]);
    assert_eq!(result.collection.names(), vec!["A", "B", TOTAL]);

    let total = result.collection.forecast(TOTAL).unwrap();
    assert_eq!(total.row_count(), 4);
    assert_eq!(total.datetime_column(DS).unwrap()[3], month_start(4));

    // The in-sample fit of the derived total reproduces the row sums
    let model = result.collection.model(TOTAL).unwrap();
    let metrics: ForecastMetrics = model.fit_metrics().unwrap();
    assert!(metrics.mae < 1.0, "mae = {}", metrics.mae);
    let yhat = total.f64_column(YHAT).unwrap();
    for (fitted, expected) in yhat.iter().zip([15.0, 25.0, 35.0]) {
        assert!((fitted - expected).abs() < 1.0, "{} vs {}", fitted, expected);
    }
}

#[test]
fn test_output_tables() {
    let result = forecast_all(&two_brands(), &one_step()).unwrap();

    let tot = &result.total_forecast;
    assert_eq!(
        tot.column_names(),
        &[DATE, REV_FORECAST, UPPER_ESTIMATE, LOWER_ESTIMATE]
    );
    let total = result.collection.forecast(TOTAL).unwrap();
    assert_eq!(tot.f64_column(REV_FORECAST).unwrap(), total.f64_column(YHAT).unwrap());
    assert_eq!(
        tot.f64_column(UPPER_ESTIMATE).unwrap(),
        total.f64_column(YHAT_UPPER).unwrap()
    );
    assert_eq!(
        tot.f64_column(LOWER_ESTIMATE).unwrap(),
        total.f64_column(YHAT_LOWER).unwrap()
    );

    let by_series = &result.by_series;
    assert_eq!(by_series.row_count(), 4);
    assert_eq!(by_series.column_names(), &["A", "B", "total"]);
    assert_eq!(
        by_series.datetime_index().unwrap().values(),
        total.datetime_column(DS).unwrap()
    );
    for name in &result.names {
        assert_eq!(
            by_series.f64_column(name).unwrap(),
            result.collection.forecast(name).unwrap().f64_column(YHAT).unwrap()
        );
    }
}

#[test]
fn test_supplied_total_is_not_rederived() {
    let mut df = DataFrame::with_index(DatetimeIndex::new(vec![
        month_start(1),
        month_start(2),
        month_start(3),
    ]));
    df.add_column("A", vec![10.0, 20.0, 30.0]).unwrap();
    df.add_column(TOTAL, vec![100.0, 100.0, 100.0]).unwrap();
    df.add_column("B", vec![5.0, 5.0, 5.0]).unwrap();

    let result = forecast_all(&df, &one_step()).unwrap();
    assert_eq!(result.names, vec!["A", "total", "B"]);

    let yhat = result.collection.forecast(TOTAL).unwrap().f64_column(YHAT).unwrap();
    assert!(yhat.iter().all(|v| (v - 100.0).abs() < 1e-6));
}

#[test]
fn test_idempotent() {
    let df = two_brands();
    let first = forecast_all(&df, &one_step()).unwrap();
    let second = forecast_all(&df, &one_step()).unwrap();

    assert_eq!(first.names, second.names);
    assert_eq!(first.total_forecast, second.total_forecast);
    assert_eq!(first.by_series, second.by_series);
}

#[test]
fn test_bad_mode_fails_before_fitting() {
    let toml = r#"
        [forecast]
        mode = "exponential"
    "#;
    assert!(matches!(
        BatchConfig::from_toml(toml),
        Err(Error::ConfigError(_))
    ));

    // A frame too short to fit still reports the configuration problem
    let mut short = DataFrame::with_index(DatetimeIndex::new(vec![month_start(1)]));
    short.add_column("A", vec![1.0]).unwrap();
    let config = BatchConfig::new(ForecastConfig::default().with_interval_width(0.0));
    assert!(matches!(
        forecast_all(&short, &config),
        Err(Error::ConfigError(_))
    ));
}

#[test]
fn test_persisted_files() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("results");
    let config = one_step().with_output(OutputConfig::to_dir(&out, "q1"));

    let result = forecast_all(&two_brands(), &config).unwrap();
    let written = result.written.clone().unwrap();
    assert_eq!(written.tot, out.join("q1_tot.csv"));
    assert_eq!(written.by_series, out.join("q1_byBrand.csv"));

    let tot_text = std::fs::read_to_string(&written.tot).unwrap();
    let lines: Vec<&str> = tot_text.lines().collect();
    assert_eq!(lines[0], "date,rev_forecast,upper_estimate,lower_estimate");
    assert_eq!(lines.len(), 5);
    assert!(lines[4].starts_with("2023-04-01,"));

    let by_text = std::fs::read_to_string(&written.by_series).unwrap();
    let lines: Vec<&str> = by_text.lines().collect();
    assert_eq!(lines[0], "date,A,B,total");
    assert_eq!(lines.len(), 5);

    let back = read_csv(&written.by_series).unwrap();
    assert_eq!(back.column_names(), &["A", "B", "total"]);
    assert_eq!(
        back.datetime_index().unwrap().values(),
        result.by_series.datetime_index().unwrap().values()
    );
    for name in ["A", "B", "total"] {
        let read = back.f64_column(name).unwrap();
        let kept = result.by_series.f64_column(name).unwrap();
        for (r, k) in read.iter().zip(kept) {
            assert!((r - k).abs() < 1e-9);
        }
    }
}

#[test]
fn test_nothing_written_when_disabled() {
    let dir = tempdir().unwrap();
    let mut output = OutputConfig::to_dir(dir.path(), "q1");
    output.enabled = false;

    let result = forecast_all(&two_brands(), &one_step().with_output(output)).unwrap();
    assert!(result.written.is_none());
    assert!(!dir.path().join("q1_tot.csv").exists());
}

#[test]
fn test_fit_failure_aborts_run() {
    let dir = tempdir().unwrap();
    let mut df = two_brands();
    df.add_column("C", vec![1.0, f64::NAN, 3.0]).unwrap();
    let config = one_step().with_output(OutputConfig::to_dir(dir.path(), "q1"));

    let err = forecast_all(&df, &config).unwrap_err();
    assert!(err.is_fit_error());
    assert!(!dir.path().join("q1_tot.csv").exists());
    assert!(!dir.path().join("q1_byBrand.csv").exists());
}

/// Carries the last observed value forward
struct LastValue {
    history: Vec<NaiveDateTime>,
    last: Option<f64>,
}

impl Forecaster for LastValue {
    fn from_config(_config: &ForecastConfig) -> Self {
        LastValue {
            history: Vec::new(),
            last: None,
        }
    }

    fn fit(&mut self, history: &DataFrame) -> revcast::Result<()> {
        self.history = history.datetime_column(DS)?.to_vec();
        self.last = history.f64_column("y")?.last().copied();
        Ok(())
    }

    fn make_future_dataframe(
        &self,
        periods: usize,
        freq: Frequency,
        include_history: bool,
    ) -> revcast::Result<DataFrame> {
        let last = *self
            .history
            .last()
            .ok_or_else(|| Error::FitError("not fitted".to_string()))?;
        let mut dates = if include_history {
            self.history.clone()
        } else {
            Vec::new()
        };
        dates.extend(extend_after(last, periods, freq)?);
        let mut future = DataFrame::new();
        future.add_column(DS, dates)?;
        Ok(future)
    }

    fn predict(&self, future: &DataFrame) -> revcast::Result<DataFrame> {
        let ds = future.datetime_column(DS)?;
        let value = self
            .last
            .ok_or_else(|| Error::FitError("not fitted".to_string()))?;
        let mut forecast = DataFrame::new();
        forecast.add_column(DS, ds.to_vec())?;
        forecast.add_column(YHAT_LOWER, vec![value - 1.0; ds.len()])?;
        forecast.add_column(YHAT_UPPER, vec![value + 1.0; ds.len()])?;
        forecast.add_column(YHAT, vec![value; ds.len()])?;
        Ok(forecast)
    }

    fn yearly_component(&self, dates: &[NaiveDateTime]) -> revcast::Result<Vec<f64>> {
        Ok(vec![0.0; dates.len()])
    }

    fn fit_metrics(&self) -> revcast::Result<ForecastMetrics> {
        Err(Error::FitError("no in-sample fit".to_string()))
    }

    fn name(&self) -> &str {
        "Last Value"
    }
}

#[test]
fn test_custom_forecaster() {
    let config = BatchConfig::new(
        ForecastConfig::default()
            .with_periods(2)
            .with_freq(Frequency::MonthStart),
    );
    let result = forecast_all_with::<LastValue>(&two_brands(), &config).unwrap();

    assert_eq!(result.names, vec!["A", "B", "total"]);
    let rev = result.total_forecast.f64_column(REV_FORECAST).unwrap();
    assert_eq!(rev, &[35.0; 5]);
    assert_eq!(result.by_series.f64_column("A").unwrap()[4], 30.0);
    assert_eq!(result.collection.model("B").unwrap().name(), "Last Value");
}
