//! Configuration for forecasting runs
//!
//! Every field is optional in files and environment variables; missing values
//! fall back to the defaults documented on each struct. Supported sources:
//! - TOML, YAML and JSON files (picked by extension)
//! - `REVCAST_*` environment variables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::temporal::Frequency;

pub mod loader;

/// How seasonal effects combine with the trend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SeasonalityMode {
    /// Seasonal effect scales with the trend level
    #[default]
    Multiplicative,
    /// Seasonal effect is a constant offset
    Additive,
}

impl SeasonalityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalityMode::Multiplicative => "multiplicative",
            SeasonalityMode::Additive => "additive",
        }
    }
}

impl FromStr for SeasonalityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "multiplicative" => Ok(SeasonalityMode::Multiplicative),
            "additive" => Ok(SeasonalityMode::Additive),
            other => Err(Error::ConfigError(format!(
                "invalid seasonality mode '{}': must be 'multiplicative' or 'additive'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for SeasonalityMode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SeasonalityMode> for String {
    fn from(mode: SeasonalityMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model and horizon settings shared by every series in a run
///
/// Defaults: multiplicative mode, 18 periods at month start, yearly Fourier
/// order 10, seasonality prior scale 10.0, interval width 0.8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Seasonality mode
    pub mode: SeasonalityMode,
    /// Number of future periods to forecast
    pub periods: usize,
    /// Frequency of the future periods
    pub freq: Frequency,
    /// Fourier order of the yearly seasonality (0 disables it)
    pub yearly_order: usize,
    /// Prior scale of the seasonal coefficients; larger allows stronger seasonality
    pub seasonality_prior_scale: f64,
    /// Width of the uncertainty interval, in (0, 1)
    pub interval_width: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            mode: SeasonalityMode::Multiplicative,
            periods: 18,
            freq: Frequency::MonthStart,
            yearly_order: 10,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
        }
    }
}

impl ForecastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: SeasonalityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the mode from its name; fails with `ConfigError` on anything but
    /// `multiplicative` or `additive`
    pub fn with_mode_str(mut self, mode: &str) -> Result<Self> {
        self.mode = mode.parse()?;
        Ok(self)
    }

    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = freq;
        self
    }

    /// Set the frequency from a code such as `MS` or `D`
    pub fn with_freq_str(mut self, freq: &str) -> Result<Self> {
        self.freq = freq.parse()?;
        Ok(self)
    }

    pub fn with_yearly_order(mut self, order: usize) -> Self {
        self.yearly_order = order;
        self
    }

    pub fn with_seasonality_prior_scale(mut self, scale: f64) -> Self {
        self.seasonality_prior_scale = scale;
        self
    }

    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.periods == 0 {
            return Err(Error::ConfigError(
                "forecast horizon must be at least one period".to_string(),
            ));
        }
        if !(self.seasonality_prior_scale.is_finite() && self.seasonality_prior_scale > 0.0) {
            return Err(Error::ConfigError(format!(
                "seasonality prior scale must be positive, got {}",
                self.seasonality_prior_scale
            )));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(Error::ConfigError(format!(
                "interval width must lie strictly between 0 and 1, got {}",
                self.interval_width
            )));
        }
        if self.freq.nominal_seconds() <= 0 {
            return Err(Error::ConfigError(format!(
                "frequency {} does not advance time",
                self.freq
            )));
        }
        Ok(())
    }
}

/// Where and whether batch results are written
///
/// Defaults: disabled, directory `output`, base name `forecast`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the two result files
    pub enabled: bool,
    /// Directory receiving the files; created when missing
    pub dir: PathBuf,
    /// File name stem; `_tot.csv` and `_byBrand.csv` are appended
    pub base_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            enabled: false,
            dir: PathBuf::from("output"),
            base_name: "forecast".to_string(),
        }
    }
}

impl OutputConfig {
    /// Enabled output under `dir` with the given base name
    pub fn to_dir<P: AsRef<Path>>(dir: P, base_name: &str) -> Self {
        OutputConfig {
            enabled: true,
            dir: dir.as_ref().to_path_buf(),
            base_name: base_name.to_string(),
        }
    }

    /// Path of the aggregate forecast file
    pub fn tot_path(&self) -> PathBuf {
        self.dir.join(format!("{}_tot.csv", self.base_name))
    }

    /// Path of the per-series point estimate file
    pub fn by_series_path(&self) -> PathBuf {
        self.dir.join(format!("{}_byBrand.csv", self.base_name))
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.base_name.trim().is_empty() {
            return Err(Error::ConfigError(
                "output base name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for a multi-series forecasting run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub forecast: ForecastConfig,
    pub output: OutputConfig,
}

impl BatchConfig {
    pub fn new(forecast: ForecastConfig) -> Self {
        BatchConfig {
            forecast,
            output: OutputConfig::default(),
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Load configuration from a file (TOML, YAML or JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_from_file(path.as_ref())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        loader::load_from_toml(toml)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        loader::load_from_yaml(yaml)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        loader::load_from_json(json)
    }

    /// Defaults overridden by `REVCAST_*` environment variables
    pub fn from_env() -> Result<Self> {
        loader::load_from_env()
    }

    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        self.output.validate()
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
