//! Configuration loading utilities

use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::BatchConfig;
use crate::error::{Error, Result};

/// Load configuration from a file, choosing the format by extension
pub fn load_from_file(path: &Path) -> Result<BatchConfig> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    debug!("loading configuration from {}", path.display());
    match extension.as_deref() {
        Some("toml") => load_from_toml(&content),
        Some("yaml") | Some("yml") => load_from_yaml(&content),
        Some("json") => load_from_json(&content),
        _ => Err(Error::ConfigError(format!(
            "unsupported configuration file format: {}",
            path.display()
        ))),
    }
}

pub fn load_from_toml(toml: &str) -> Result<BatchConfig> {
    let config: BatchConfig = toml::from_str(toml).map_err(|e| config_error("TOML", e))?;
    Ok(config)
}

pub fn load_from_yaml(yaml: &str) -> Result<BatchConfig> {
    let config: BatchConfig = serde_yaml::from_str(yaml).map_err(|e| config_error("YAML", e))?;
    Ok(config)
}

pub fn load_from_json(json: &str) -> Result<BatchConfig> {
    let config: BatchConfig = serde_json::from_str(json).map_err(|e| config_error("JSON", e))?;
    Ok(config)
}

/// Defaults overridden by `REVCAST_*` environment variables
pub fn load_from_env() -> Result<BatchConfig> {
    let mut config = BatchConfig::default();

    if let Ok(mode) = env::var("REVCAST_MODE") {
        config.forecast.mode = mode.parse()?;
    }
    if let Ok(periods) = env::var("REVCAST_PERIODS") {
        config.forecast.periods = parse_var("REVCAST_PERIODS", &periods)?;
    }
    if let Ok(freq) = env::var("REVCAST_FREQ") {
        config.forecast.freq = freq.parse()?;
    }
    if let Ok(order) = env::var("REVCAST_YEARLY_ORDER") {
        config.forecast.yearly_order = parse_var("REVCAST_YEARLY_ORDER", &order)?;
    }
    if let Ok(scale) = env::var("REVCAST_PRIOR_SCALE") {
        config.forecast.seasonality_prior_scale = parse_var("REVCAST_PRIOR_SCALE", &scale)?;
    }
    if let Ok(width) = env::var("REVCAST_INTERVAL_WIDTH") {
        config.forecast.interval_width = parse_var("REVCAST_INTERVAL_WIDTH", &width)?;
    }
    if let Ok(dir) = env::var("REVCAST_OUTPUT_DIR") {
        config.output.dir = PathBuf::from(dir);
    }
    if let Ok(base) = env::var("REVCAST_OUTPUT_BASE") {
        config.output.base_name = base;
    }
    if let Ok(persist) = env::var("REVCAST_PERSIST") {
        config.output.enabled = parse_bool("REVCAST_PERSIST", &persist)?;
    }

    Ok(config)
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::ConfigError(format!("invalid {}: {}", name, e)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::ConfigError(format!("invalid {}: {}", name, other))),
    }
}

fn config_error(format: &str, err: impl std::fmt::Display) -> Error {
    Error::ConfigError(format!("failed to parse {} configuration: {}", format, err))
}
