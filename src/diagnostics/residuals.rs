//! Standardized, studentized and PRESS residuals.

use super::influence::flagged;
use faer::Col;

/// Residuals scaled by the residual standard error, e_i / sqrt(MSE).
///
/// Without a usable MSE only exact zeros survive; every other entry is NaN.
pub fn standardized_residuals(residuals: &Col<f64>, mse: f64) -> Col<f64> {
    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(residuals.nrows(), |i| {
            if residuals[i].abs() < 1e-14 {
                0.0
            } else {
                f64::NAN
            }
        });
    }

    let s = mse.sqrt();
    Col::from_fn(residuals.nrows(), |i| residuals[i] / s)
}

/// Internally studentized residuals e_i / (s · sqrt(1 - h_ii)), s = sqrt(MSE).
pub fn studentized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let sigma = mse.sqrt();
    Col::from_fn(n, |i| residuals[i] / (sigma * (1.0 - leverage[i]).max(1e-14).sqrt()))
}

/// Externally studentized (deleted) residuals e_i / (s_(i) · sqrt(1 - h_ii)).
///
/// s_(i) comes from the deletion identity RSS_(i) = RSS - e_i² / (1 - h_ii)
/// on n - p - 1 degrees of freedom, so no refit is needed. Entries whose
/// deleted RSS is not positive are NaN.
pub fn externally_studentized_residuals(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();
    let df_resid = n.saturating_sub(n_params);

    if df_resid <= 1 || mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let rss = mse * df_resid as f64;
    let df_loo = (df_resid - 1) as f64;

    Col::from_fn(n, |i| {
        let e = residuals[i];
        let complement = (1.0 - leverage[i]).max(1e-14);
        let deleted_mse = (rss - e * e / complement) / df_loo;

        if deleted_mse <= 0.0 {
            f64::NAN
        } else {
            e / (deleted_mse * complement).sqrt()
        }
    })
}

/// PRESS residuals e_i / (1 - h_ii).
///
/// Each entry equals the prediction error at observation i of a fit that
/// excludes observation i, without refitting.
pub fn press_residuals(residuals: &Col<f64>, leverage: &Col<f64>) -> Col<f64> {
    Col::from_fn(residuals.nrows(), |i| {
        residuals[i] / (1.0 - leverage[i]).max(1e-14)
    })
}

/// PRESS statistic: sum of squared PRESS residuals.
pub fn press_statistic(press: &Col<f64>) -> f64 {
    press.iter().map(|&e| e * e).sum()
}

/// Indices of observations with |r_i| above `threshold` (usually 2 or 3).
pub fn residual_outliers(studentized: &Col<f64>, threshold: f64) -> Vec<usize> {
    flagged(studentized, |r| r.abs() > threshold)
}
