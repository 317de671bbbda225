//! Leverage (hat matrix diagonal) calculations.

use super::influence::flagged;
use crate::solvers::RegressionError;
use crate::utils::{build_design_matrix, column_norms, outer_gram, thin_qr, triangular_rank};
use faer::{Col, Mat};

/// Hat matrix H = Q Qᵀ from the thin orthonormal factor of the design.
///
/// This is the projection onto the column space of X, formed without
/// inverting XᵀX.
pub fn hat_matrix_from_q(q: &Mat<f64>) -> Mat<f64> {
    outer_gram(q)
}

/// Leverage values read off the rows of the thin Q factor.
///
/// h_ii = Σ_k Q_ik², the diagonal of Q Qᵀ, clamped into [0, 1].
pub fn leverage_from_q(q: &Mat<f64>) -> Col<f64> {
    Col::from_fn(q.nrows(), |i| q.row(i).squared_norm_l2().clamp(0.0, 1.0))
}

/// Compute leverage values (diagonal of hat matrix H = X(X'X)^(-1)X').
///
/// Leverage measures the influence of each observation on its own fitted value.
/// High leverage points have unusual predictor values.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of parameters)
/// - Points with h_ii > 2p/n are considered high leverage
///
/// # Errors
/// `EmptyDesign` without any column, `Underdetermined` when the design has
/// more columns than rows and `RankDeficient` when its columns are linearly
/// dependent.
pub fn compute_leverage(
    x: &Mat<f64>,
    with_intercept: bool,
    rank_tolerance: f64,
) -> Result<Col<f64>, RegressionError> {
    let design = build_design_matrix(x, with_intercept);
    let n = design.nrows();
    let p = design.ncols();

    if p == 0 {
        return Err(RegressionError::EmptyDesign);
    }
    if p > n {
        return Err(RegressionError::Underdetermined {
            n_observations: n,
            n_parameters: p,
        });
    }

    let (q, r) = thin_qr(&design);
    let rank = triangular_rank(&r, &column_norms(&design), rank_tolerance);
    if rank < p {
        return Err(RegressionError::RankDeficient {
            rank,
            n_parameters: p,
        });
    }

    Ok(leverage_from_q(&q))
}

/// Conventional high-leverage cutoff 2p/n.
pub fn high_leverage_threshold(n_params: usize, n_observations: usize) -> f64 {
    2.0 * n_params as f64 / n_observations as f64
}

/// Indices of observations whose leverage exceeds `threshold`, which
/// defaults to 2p/n.
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let cutoff =
        threshold.unwrap_or_else(|| high_leverage_threshold(n_params, leverage.nrows()));
    flagged(leverage, |h| h > cutoff)
}
