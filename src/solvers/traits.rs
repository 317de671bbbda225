//! Core traits for regression estimators.

use crate::core::{DataFrame, FrameError, OptionsError, RegressionResult};
use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during fitting or diagnostics.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error(
        "underdetermined system: {n_parameters} parameters for {n_observations} observations"
    )]
    Underdetermined {
        n_observations: usize,
        n_parameters: usize,
    },

    #[error("design matrix has no columns")]
    EmptyDesign,

    #[error("design matrix is rank deficient: rank {rank} for {n_parameters} parameters")]
    RankDeficient { rank: usize, n_parameters: usize },

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("convergence failed after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("invalid data: {0}")]
    Frame(#[from] FrameError),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),
}

/// An estimator holding configuration only.
///
/// Fitting borrows the data and returns an independent fitted model, so one
/// estimator can be reused across datasets.
pub trait Regressor {
    type Fitted: FittedRegressor;

    /// Fit against the predictor table `data` (n rows, k columns) and the
    /// response `y` (length n).
    fn fit(&self, data: &DataFrame, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// Behaviour shared by every fitted model.
pub trait FittedRegressor {
    /// Predicted responses for the rows of `x`, which must carry the same
    /// predictor columns (no intercept column) as the training table.
    fn predict(&self, x: &Mat<f64>) -> Col<f64>;

    /// Summary statistics of the fit.
    fn result(&self) -> &RegressionResult;

    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    fn residuals(&self) -> &Col<f64> {
        &self.result().residuals
    }

    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    /// Out-of-sample R² of the predictions for `x` against `y`.
    ///
    /// A constant `y` scores 1.0 when predicted exactly and 0.0 otherwise.
    fn score(&self, x: &Mat<f64>, y: &Col<f64>) -> f64 {
        let predictions = self.predict(x);
        let n = y.nrows() as f64;
        let centre = y.iter().sum::<f64>() / n;

        let (rss, tss) = y
            .iter()
            .zip(predictions.iter())
            .fold((0.0, 0.0), |(rss, tss), (&observed, &predicted)| {
                (
                    rss + (observed - predicted).powi(2),
                    tss + (observed - centre).powi(2),
                )
            });

        match (tss > 0.0, rss == 0.0) {
            (true, _) => 1.0 - rss / tss,
            (false, true) => 1.0,
            (false, false) => 0.0,
        }
    }
}
