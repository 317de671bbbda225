//! Leave-one-out refits for DFFITS and DFBETA.
//!
//! Each observation is handled by an independent worker that owns a
//! row-removed copy of the training container and response and fits its own
//! model. Nothing is shared mutably between workers, and results are
//! assembled in observation order after every worker has finished.

use crate::core::RegressionOptions;
use crate::solvers::{FittedOls, OlsRegressor, RegressionError, Regressor};
use faer::{Col, Mat};
use rayon::prelude::*;

/// The result of refitting without one observation.
#[derive(Debug, Clone)]
pub struct LeaveOneOutFit {
    /// Parameter vector β₍ᵢ₎ (intercept first when present).
    pub parameters: Col<f64>,
    /// Prediction of the refit at the held-out row.
    pub prediction: f64,
    /// Mean squared error of the refit, RSS₍ᵢ₎ / (n - 1 - p).
    pub mse: f64,
}

/// DFFITS, DFBETA and DFBETAS from a single leave-one-out pass.
#[derive(Debug, Clone)]
pub struct InfluenceMeasures {
    /// (ŷ_i - ŷ₍ᵢ₎) / sqrt(MSE₍ᵢ₎ h_ii), length n.
    pub dffits: Col<f64>,
    /// β - β₍ᵢ₎, n × p.
    pub dfbeta: Mat<f64>,
    /// DFBETA scaled by sqrt(MSE₍ᵢ₎ (XᵀX)⁻¹_jj), n × p.
    pub dfbetas: Mat<f64>,
}

/// Refit the model once per observation with that observation removed.
///
/// # Errors
/// `InsufficientObservations` unless n > p + 1, checked before any refit.
/// Otherwise the first worker error in observation order, reported after
/// all workers have completed.
pub fn leave_one_out_fits(fitted: &FittedOls) -> Result<Vec<LeaveOneOutFit>, RegressionError> {
    let n = fitted.n_observations();
    let p = fitted.n_parameters();

    if n <= p + 1 {
        return Err(RegressionError::InsufficientObservations {
            needed: p + 2,
            got: n,
        });
    }

    let options = RegressionOptions {
        compute_inference: false,
        ..fitted.options().clone()
    };
    let model = OlsRegressor::new(options);
    let data = fitted.data();
    let response = fitted.response();

    let outcomes: Vec<Result<LeaveOneOutFit, RegressionError>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let reduced = data.remove_row(i)?;
            let target = Col::from_fn(n - 1, |k| response[if k < i { k } else { k + 1 }]);
            let refit = model.fit(&reduced, &target)?;
            let held_out = data.row(i)?;

            Ok(LeaveOneOutFit {
                parameters: refit.parameters().clone(),
                prediction: refit.predict_row(&held_out),
                mse: refit.mean_squared_error(),
            })
        })
        .collect();

    let failures = outcomes.iter().filter(|o| o.is_err()).count();
    if failures > 0 {
        log::warn!(
            "leave-one-out: {} of {} refits failed, reporting the first",
            failures,
            n
        );
    } else {
        log::debug!("leave-one-out: {} refits completed (p={})", n, p);
    }

    outcomes.into_iter().collect()
}

/// DFFITS from leave-one-out refits.
pub fn dffits_from_fits(
    fitted_values: &Col<f64>,
    leverage: &Col<f64>,
    fits: &[LeaveOneOutFit],
) -> Col<f64> {
    Col::from_fn(fits.len(), |i| {
        let fit = &fits[i];
        (fitted_values[i] - fit.prediction) / (fit.mse * leverage[i]).sqrt()
    })
}

/// DFBETA matrix β - β₍ᵢ₎ from leave-one-out refits.
pub fn dfbeta_from_fits(parameters: &Col<f64>, fits: &[LeaveOneOutFit]) -> Mat<f64> {
    Mat::from_fn(fits.len(), parameters.nrows(), |i, j| {
        parameters[j] - fits[i].parameters[j]
    })
}

/// Scale a DFBETA matrix into DFBETAS.
///
/// `unscaled_covariance` is (XᵀX)⁻¹ of the full fit.
pub fn dfbetas_from_dfbeta(
    dfbeta: &Mat<f64>,
    unscaled_covariance: &Mat<f64>,
    fits: &[LeaveOneOutFit],
) -> Mat<f64> {
    Mat::from_fn(dfbeta.nrows(), dfbeta.ncols(), |i, j| {
        dfbeta[(i, j)] / (fits[i].mse * unscaled_covariance[(j, j)]).sqrt()
    })
}

/// Euclidean norm of each row.
pub fn row_norms(m: &Mat<f64>) -> Col<f64> {
    Col::from_fn(m.nrows(), |i| m.row(i).norm_l2())
}
