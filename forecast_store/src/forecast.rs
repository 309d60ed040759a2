//! Per-series forecasting primitive: an ordinary-least-squares linear trend
//! over the observation index, with regression prediction intervals.
//!
//! This is the store's stand-in for a managed forecasting function: fit
//! parameters are small enough to persist as a table row, prediction is a
//! closed-form evaluation, and the interval honors the configured
//! confidence level.

use thiserror::Error;

/// Why a series could not be fitted. Callers skip the series, they do not
/// abort the training run.
#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    /// Fewer observations than the residual-variance estimate needs.
    #[error("series too short: {n} observations, need at least 3")]
    TooShort {
        /// Number of observations in the offending series.
        n: usize,
    },

    /// The fit produced non-finite parameters (e.g. NaN closes).
    #[error("series produced a degenerate fit")]
    Degenerate,
}

/// Fitted linear-trend parameters for one series.
///
/// `x` is the observation index 0..n; forecasts evaluate the line past the
/// last index. `x_mean`/`x_sq_sum` are retained for the interval width.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFit {
    /// Intercept of the fitted line.
    pub intercept: f64,
    /// Slope per observation step.
    pub slope: f64,
    /// Residual standard error (denominator n - 2).
    pub resid_std: f64,
    /// Mean of the observation indices.
    pub x_mean: f64,
    /// Centered sum of squares of the observation indices.
    pub x_sq_sum: f64,
    /// Number of observations the fit saw.
    pub n_obs: usize,
}

/// One forecast point with its prediction interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Point forecast.
    pub forecast: f64,
    /// Lower interval bound.
    pub lower_bound: f64,
    /// Upper interval bound.
    pub upper_bound: f64,
}

/// In-sample evaluation metrics for one fitted series.
#[derive(Debug, Clone, PartialEq)]
pub struct FitMetrics {
    /// Root mean squared error of the residuals.
    pub rmse: f64,
    /// Mean absolute percentage error, in percent.
    pub mape: f64,
}

/// Fits a linear trend to `values` indexed 0..n.
pub fn fit_linear_trend(values: &[f64]) -> Result<TrendFit, FitError> {
    let n = values.len();
    if n < 3 {
        return Err(FitError::TooShort { n });
    }

    let nf = n as f64;
    let x_mean = (nf - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / nf;

    let mut x_sq_sum = 0.0;
    let mut xy_sum = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        x_sq_sum += dx * dx;
        xy_sum += dx * (y - y_mean);
    }

    let slope = xy_sum / x_sq_sum;
    let intercept = y_mean - slope * x_mean;

    let sse: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| {
            let resid = y - (intercept + slope * i as f64);
            resid * resid
        })
        .sum();
    let resid_std = (sse / (nf - 2.0)).sqrt();

    if !(intercept.is_finite() && slope.is_finite() && resid_std.is_finite()) {
        return Err(FitError::Degenerate);
    }

    Ok(TrendFit {
        intercept,
        slope,
        resid_std,
        x_mean,
        x_sq_sum,
        n_obs: n,
    })
}

impl TrendFit {
    /// Evaluates the trend `steps_ahead` observations past the last one,
    /// with bounds at the given standard-normal quantile `z`.
    ///
    /// The interval is the textbook regression prediction interval: it
    /// widens with distance from the training window's center.
    pub fn point(&self, steps_ahead: u32, z: f64) -> ForecastPoint {
        let x = (self.n_obs - 1) as f64 + steps_ahead as f64;
        let forecast = self.intercept + self.slope * x;

        let nf = self.n_obs as f64;
        let dx = x - self.x_mean;
        let se = self.resid_std * (1.0 + 1.0 / nf + dx * dx / self.x_sq_sum).sqrt();

        ForecastPoint {
            forecast,
            lower_bound: forecast - z * se,
            upper_bound: forecast + z * se,
        }
    }

    /// In-sample RMSE and MAPE against the training values.
    pub fn metrics(&self, values: &[f64]) -> FitMetrics {
        let nf = values.len() as f64;
        let mut sse = 0.0;
        let mut ape_sum = 0.0;
        let mut ape_n = 0usize;

        for (i, y) in values.iter().enumerate() {
            let resid = y - (self.intercept + self.slope * i as f64);
            sse += resid * resid;
            if *y != 0.0 {
                ape_sum += (resid / y).abs();
                ape_n += 1;
            }
        }

        FitMetrics {
            rmse: (sse / nf).sqrt(),
            mape: if ape_n > 0 {
                100.0 * ape_sum / ape_n as f64
            } else {
                0.0
            },
        }
    }
}

/// Standard normal quantile function (inverse CDF).
///
/// Acklam's rational approximation; absolute error below 4.5e-4 across
/// (0, 1), which is far tighter than anything a price interval needs.
pub fn normal_quantile(p: f64) -> f64 {
    debug_assert!(p > 0.0 && p < 1.0);

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fits_an_exact_line() {
        // y = 2x + 10, zero residuals.
        let values: Vec<f64> = (0..10).map(|x| 2.0 * x as f64 + 10.0).collect();
        let fit = fit_linear_trend(&values).expect("fit");

        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 10.0).abs() < 1e-9);
        assert!(fit.resid_std < 1e-9);

        let point = fit.point(1, 1.96);
        assert!((point.forecast - 30.0).abs() < 1e-9);
        assert!((point.upper_bound - point.lower_bound) < 1e-6);
    }

    #[test]
    fn short_series_is_rejected() {
        assert_eq!(
            fit_linear_trend(&[1.0, 2.0]),
            Err(FitError::TooShort { n: 2 })
        );
    }

    #[test]
    fn nan_values_are_rejected() {
        assert_eq!(
            fit_linear_trend(&[1.0, f64::NAN, 3.0, 4.0]),
            Err(FitError::Degenerate)
        );
    }

    #[test]
    fn interval_widens_with_horizon() {
        let values = [100.0, 102.0, 101.0, 104.0, 103.0, 106.0, 105.0];
        let fit = fit_linear_trend(&values).expect("fit");
        let z = normal_quantile(0.975);

        let near = fit.point(1, z);
        let far = fit.point(7, z);

        assert!(near.lower_bound < near.forecast && near.forecast < near.upper_bound);
        assert!(
            (far.upper_bound - far.lower_bound) > (near.upper_bound - near.lower_bound),
            "interval must widen with distance from the training window"
        );
    }

    #[test]
    fn normal_quantile_matches_known_values() {
        assert!(normal_quantile(0.5).abs() < 1e-9);
        assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-3);
        assert!((normal_quantile(0.025) + 1.959964).abs() < 1e-3);
        assert!((normal_quantile(0.995) - 2.575829).abs() < 1e-3);
    }
}
