use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// In-sample fit metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error; `None` when an actual value is zero
    pub mape: Option<f64>,
}

impl ForecastMetrics {
    /// Compare actual values with fitted values of the same length
    pub fn from_fit(actual: &[f64], fitted: &[f64]) -> Result<Self> {
        if actual.len() != fitted.len() {
            return Err(Error::LengthMismatch {
                expected: actual.len(),
                actual: fitted.len(),
            });
        }
        if actual.is_empty() {
            return Err(Error::EmptyData("no fitted values".to_string()));
        }

        let n = actual.len() as f64;
        let errors: Vec<f64> = actual.iter().zip(fitted).map(|(a, f)| a - f).collect();

        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
        let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
        let mape = if actual.iter().any(|a| *a == 0.0) {
            None
        } else {
            Some(
                errors
                    .iter()
                    .zip(actual)
                    .map(|(e, a)| (e / a).abs())
                    .sum::<f64>()
                    / n
                    * 100.0,
            )
        };

        Ok(ForecastMetrics { mae, rmse, mape })
    }
}
