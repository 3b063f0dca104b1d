//! Time-series forecasting for the augmentation stage.
//!
//! The pipeline treats forecasting as an injectable collaborator: anything
//! that can fit a value sequence and predict a few future points. The
//! built-in implementation fits an ARIMA(2,1,2) model with the
//! Hannan-Rissanen two-step procedure, which reduces the whole fit to a
//! pair of linear least-squares problems.

use crate::error::{AskChartError, Result};

/// Trait for time-series forecasting engines.
///
/// Implementations may fail for ill-conditioned input; callers are
/// expected to treat any error as "no forecast".
pub trait Forecaster: Send + Sync {
    /// Fits a model on `values` (already in temporal order) and returns
    /// `horizon` forecasted points.
    fn fit_and_forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>>;
}

/// ARIMA(2,1,2) forecaster.
///
/// Estimation: difference once, fit a long autoregression to estimate the
/// innovation sequence, then regress each differenced value on its two
/// lags and the two lagged innovations (Hannan-Rissanen). Forecasts are
/// produced by recursing on the fitted equation with future innovations
/// set to zero, then integrating back to the original scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArimaForecaster;

/// Minimum number of observations the fit needs.
const MIN_OBSERVATIONS: usize = 10;

/// Ridge term added to the normal equations; keeps collinear designs
/// (constant or perfectly linear series) solvable.
const RIDGE: f64 = 1e-8;

impl ArimaForecaster {
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for ArimaForecaster {
    fn fit_and_forecast(&self, values: &[f64], horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Ok(Vec::new());
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AskChartError::forecast("series contains non-finite values"));
        }
        if values.len() < MIN_OBSERVATIONS {
            return Err(AskChartError::forecast(format!(
                "series too short: {} points, need at least {}",
                values.len(),
                MIN_OBSERVATIONS
            )));
        }

        // d = 1: work on first differences.
        let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let m = diffs.len();

        // Step 1: long AR fit to estimate the innovation sequence.
        let long_order = (m / 3).clamp(2, 6).min(m - 7);
        let mut rows = Vec::with_capacity(m - long_order);
        let mut targets = Vec::with_capacity(m - long_order);
        for t in long_order..m {
            let mut row = Vec::with_capacity(long_order + 1);
            row.push(1.0);
            for lag in 1..=long_order {
                row.push(diffs[t - lag]);
            }
            rows.push(row);
            targets.push(diffs[t]);
        }
        let long_coeffs = least_squares(&rows, &targets)?;

        let mut innovations = vec![0.0; m];
        for t in long_order..m {
            let mut predicted = long_coeffs[0];
            for lag in 1..=long_order {
                predicted += long_coeffs[lag] * diffs[t - lag];
            }
            innovations[t] = diffs[t] - predicted;
        }

        // Step 2: regress on two lags and two lagged innovations.
        let start = long_order + 2;
        let mut rows = Vec::with_capacity(m - start);
        let mut targets = Vec::with_capacity(m - start);
        for t in start..m {
            rows.push(vec![
                1.0,
                diffs[t - 1],
                diffs[t - 2],
                innovations[t - 1],
                innovations[t - 2],
            ]);
            targets.push(diffs[t]);
        }
        let coeffs = least_squares(&rows, &targets)?;
        let (c, ar1, ar2, ma1, ma2) = (coeffs[0], coeffs[1], coeffs[2], coeffs[3], coeffs[4]);

        // Innovations implied by the final model, for the recursion seed.
        let mut residuals = vec![0.0; m];
        for t in start..m {
            let predicted = c
                + ar1 * diffs[t - 1]
                + ar2 * diffs[t - 2]
                + ma1 * innovations[t - 1]
                + ma2 * innovations[t - 2];
            residuals[t] = diffs[t] - predicted;
        }

        // Forecast recursion with future innovations at zero, then
        // integrate the differenced predictions back onto the data scale.
        let mut diff_history = diffs;
        let mut residual_history = residuals;
        let mut level = *values.last().unwrap_or(&0.0);
        let mut forecast = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let h = diff_history.len();
            let predicted = c
                + ar1 * diff_history[h - 1]
                + ar2 * diff_history[h - 2]
                + ma1 * residual_history[h - 1]
                + ma2 * residual_history[h - 2];

            if !predicted.is_finite() {
                return Err(AskChartError::forecast("model produced non-finite forecast"));
            }

            diff_history.push(predicted);
            residual_history.push(0.0);
            level += predicted;
            forecast.push(level);
        }

        Ok(forecast)
    }
}

/// Solves min ||X theta - y||^2 (ridge-stabilized) via the normal equations.
fn least_squares(rows: &[Vec<f64>], targets: &[f64]) -> Result<Vec<f64>> {
    let k = rows.first().map(Vec::len).unwrap_or(0);
    if k == 0 || rows.len() < k {
        return Err(AskChartError::forecast("not enough points to fit the model"));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &y) in rows.iter().zip(targets) {
        for i in 0..k {
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
            xty[i] += row[i] * y;
        }
    }
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += RIDGE;
    }

    solve(xtx, xty)
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if a[pivot_row][col].abs() < 1e-12 {
            return Err(AskChartError::forecast("singular system in model fit"));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_respected() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let forecast = ArimaForecaster::new().fit_and_forecast(&values, 6).unwrap();
        assert_eq!(forecast.len(), 6);
    }

    #[test]
    fn test_linear_trend_continues() {
        let values: Vec<f64> = (1..=12).map(|v| v as f64 * 10.0).collect();
        let forecast = ArimaForecaster::new().fit_and_forecast(&values, 6).unwrap();

        let mut previous = 120.0;
        for point in forecast {
            let step = point - previous;
            assert!(
                (step - 10.0).abs() < 1.0,
                "expected ~10 per step, got {step}"
            );
            previous = point;
        }
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let values = vec![5.0; 15];
        let forecast = ArimaForecaster::new().fit_and_forecast(&values, 6).unwrap();
        for point in forecast {
            assert!((point - 5.0).abs() < 1e-3, "expected ~5, got {point}");
        }
    }

    #[test]
    fn test_short_series_errors() {
        let err = ArimaForecaster::new()
            .fit_and_forecast(&[1.0, 2.0, 3.0], 6)
            .unwrap_err();
        assert_eq!(err.category(), "Forecast Error");
    }

    #[test]
    fn test_non_finite_input_errors() {
        let mut values: Vec<f64> = (1..=12).map(|v| v as f64).collect();
        values[4] = f64::NAN;
        let err = ArimaForecaster::new().fit_and_forecast(&values, 6).unwrap_err();
        assert_eq!(err.category(), "Forecast Error");
    }

    #[test]
    fn test_zero_horizon() {
        let values: Vec<f64> = (1..=12).map(|v| v as f64).collect();
        let forecast = ArimaForecaster::new().fit_and_forecast(&values, 0).unwrap();
        assert!(forecast.is_empty());
    }

    #[test]
    fn test_forecast_is_finite() {
        let values = vec![3.0, 7.0, 4.0, 9.0, 6.0, 11.0, 8.0, 13.0, 10.0, 15.0, 12.0, 17.0];
        let forecast = ArimaForecaster::new().fit_and_forecast(&values, 6).unwrap();
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_solve_simple_system() {
        // 2x + y = 5, x + 3y = 10 -> x = 1, y = 3
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let b = vec![5.0, 10.0];
        let x = solve(a, b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_solve_singular_system_errors() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let b = vec![3.0, 6.0];
        assert!(solve(a, b).is_err());
    }
}
