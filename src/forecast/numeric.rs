//! Small numeric kernels used by the seasonal-trend model

use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Period of the yearly seasonality, in days
pub const YEAR_DAYS: f64 = 365.25;

/// Ordinary least squares fit of `y = intercept + slope * t`
///
/// Returns `(slope, intercept)`. `t` must contain at least two distinct values.
pub fn ols_line(t: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    let n = t.len() as f64;
    let sum_t: f64 = t.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_ty: f64 = t.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_tt: f64 = t.iter().map(|a| a * a).sum();

    let denom = n * sum_tt - sum_t * sum_t;
    if denom.abs() < 1e-12 {
        return Err(Error::FitError(
            "trend is undetermined: all timestamps coincide".to_string(),
        ));
    }

    let slope = (n * sum_ty - sum_t * sum_y) / denom;
    let intercept = (sum_y - slope * sum_t) / n;
    Ok((slope, intercept))
}

/// Fourier basis `[sin(2πkt/P), cos(2πkt/P)]` for k = 1..=order, one row per input
pub fn fourier_series(days: &[f64], period: f64, order: usize) -> Vec<Vec<f64>> {
    days.iter()
        .map(|&d| {
            let mut row = Vec::with_capacity(2 * order);
            for k in 1..=order {
                let x = 2.0 * PI * k as f64 * d / period;
                row.push(x.sin());
                row.push(x.cos());
            }
            row
        })
        .collect()
}

/// Ridge regression: minimise `|r - Xb|^2 + sum_j penalties[j] * b_j^2`
///
/// Rows of `x` are observations and `penalties` has one entry per column.
/// Unpenalised columns must be linearly independent on the data; positive
/// penalties keep the rest solvable even with more features than rows.
pub fn ridge(x: &[Vec<f64>], r: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let p = x.first().map_or(0, |row| row.len());
    if p == 0 {
        return Ok(Vec::new());
    }
    if penalties.len() != p {
        return Err(Error::LengthMismatch {
            expected: p,
            actual: penalties.len(),
        });
    }

    let mut a = vec![vec![0.0; p]; p];
    let mut b = vec![0.0; p];
    for (row, &target) in x.iter().zip(r) {
        for i in 0..p {
            b[i] += row[i] * target;
            for j in i..p {
                a[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        a[i][i] += penalties[i];
        for j in 0..i {
            a[i][j] = a[j][i];
        }
    }

    solve(a, b)
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(Error::FitError(
                "normal equations are singular".to_string(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

/// Dot product of a feature row with coefficients
pub fn dot(row: &[f64], coef: &[f64]) -> f64 {
    row.iter().zip(coef).map(|(a, b)| a * b).sum()
}

/// Approximate quantile of the standard normal distribution
///
/// Abramowitz and Stegun 26.2.23, absolute error below 4.5e-4.
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let result = t - (c0 + c1 * t + c2 * t * t) / (1.0 + d1 * t + d2 * t * t + d3 * t * t * t);

    if p < 0.5 {
        -result
    } else {
        result
    }
}
