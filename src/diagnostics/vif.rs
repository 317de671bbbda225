//! Variance Inflation Factor (VIF) for multicollinearity detection.

use crate::core::{DataFrame, RegressionOptions};
use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use faer::Col;
use rayon::prelude::*;

/// Compute Variance Inflation Factor for each predictor.
///
/// VIF measures how much the variance of a coefficient estimate is inflated
/// due to multicollinearity. For predictor j:
///
/// VIF_j = 1 / (1 - R²_j)
///
/// where R²_j is the R² from regressing x_j (with an intercept) on all other
/// predictor columns. Each auxiliary regression works on its own copy of the
/// container with column j dropped, so `data` is never modified and the
/// regressions run in parallel.
///
/// # Interpretation
/// - VIF = 1: No correlation with other predictors
/// - VIF > 5: Moderate multicollinearity (some sources say > 10)
/// - VIF > 10: High multicollinearity
///
/// # Errors
/// The first failing auxiliary regression, in column order.
pub fn variance_inflation_factor(
    data: &DataFrame,
    rank_tolerance: f64,
) -> Result<Col<f64>, RegressionError> {
    let p = data.ncols();

    let options = RegressionOptions {
        with_intercept: true,
        compute_inference: false,
        rank_tolerance,
        ..RegressionOptions::default()
    };
    let model = OlsRegressor::new(options);

    let outcomes: Vec<Result<f64, RegressionError>> = (0..p)
        .into_par_iter()
        .map(|j| {
            let others = data.drop_column(j)?;
            let target = data.column(j)?;
            let fitted = model.fit(&others, &target)?;
            Ok(inflation(fitted.r_squared()))
        })
        .collect();

    let failures = outcomes.iter().filter(|o| o.is_err()).count();
    if failures > 0 {
        log::warn!("vif: {} of {} auxiliary regressions failed", failures, p);
    }

    let values = outcomes.into_iter().collect::<Result<Vec<f64>, _>>()?;
    Ok(Col::from_fn(p, |j| values[j]))
}

fn inflation(r_squared: f64) -> f64 {
    let vif = if r_squared < 1.0 - 1e-14 {
        1.0 / (1.0 - r_squared)
    } else {
        f64::INFINITY
    };
    vif.max(1.0)
}

/// Identify predictors with high multicollinearity.
///
/// Returns indices of predictors with VIF > threshold.
/// Common threshold: 5 or 10.
pub fn high_vif_predictors(vif: &Col<f64>, threshold: f64) -> Vec<usize> {
    vif.iter()
        .enumerate()
        .filter(|(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}
