//! Forward-stagewise regression solver.

use crate::core::{DataFrame, RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_vector, correlation};
use faer::{Col, Mat};

/// Forward-stagewise regression estimator.
///
/// Works on standardized predictors. Starting from all-zero coefficients and
/// the mean-centered response as residual, every round picks the predictor
/// most correlated with the current residual, moves its coefficient by
/// `ε · sign(correlation)` and removes that step from the residual. Fitting
/// stops once no predictor has absolute correlation with the residual of at
/// least δ.
///
/// The estimator standardizes a private copy of the data; the caller's
/// container is left untouched. An intercept is always reported, since the
/// procedure runs on centered data.
///
/// # Example
///
/// ```rust,ignore
/// use regdiag::prelude::*;
///
/// let fitted = ForwardStagewiseRegressor::builder()
///     .step_size(0.01)
///     .correlation_threshold(0.01)
///     .build()
///     .fit(&data, &y)?;
///
/// println!("rounds: {}", fitted.n_rounds());
/// println!("coefficients: {:?}", fitted.coefficients());
/// ```
#[derive(Debug, Clone)]
pub struct ForwardStagewiseRegressor {
    options: RegressionOptions,
}

impl ForwardStagewiseRegressor {
    /// Create a new forward-stagewise regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> ForwardStagewiseRegressorBuilder {
        ForwardStagewiseRegressorBuilder::default()
    }

    /// Options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

/// Column with the largest absolute correlation to `residual`.
///
/// Linear scan with a strict comparison, so the lowest index wins ties.
fn most_correlated(columns: &[Col<f64>], residual: &Col<f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (j, column) in columns.iter().enumerate() {
        let cor = correlation(column, residual);
        match best {
            Some((_, current)) if cor.abs() <= current.abs() => {}
            _ => best = Some((j, cor)),
        }
    }
    best
}

impl Regressor for ForwardStagewiseRegressor {
    type Fitted = FittedStagewise;

    fn fit(&self, data: &DataFrame, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let (n_samples, n_features) = data.dimensions();

        if y.nrows() != n_samples {
            return Err(RegressionError::DimensionMismatch {
                x_rows: n_samples,
                y_len: y.nrows(),
            });
        }

        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let mut work = data.clone();
        let scaling = work.standardize_columns();
        let columns = (0..n_features)
            .map(|j| work.column(j))
            .collect::<Result<Vec<_>, _>>()?;

        let (mut residual, y_mean) = center_vector(y);
        let mut standardized = Col::zeros(n_features);

        let epsilon = self.options.step_size;
        let delta = self.options.correlation_threshold;
        let mut rounds = 0usize;

        let max_abs_correlation = loop {
            let Some((j, cor)) = most_correlated(&columns, &residual) else {
                break 0.0;
            };

            if cor.abs() < delta {
                break cor.abs();
            }

            if rounds >= self.options.max_iterations {
                log::warn!(
                    "forward stagewise: no convergence after {} rounds (max |cor| = {:.6})",
                    rounds,
                    cor.abs()
                );
                return Err(RegressionError::ConvergenceFailed { iterations: rounds });
            }

            let step = epsilon * cor.signum();
            standardized[j] += step;
            for i in 0..n_samples {
                residual[i] -= step * columns[j][i];
            }
            rounds += 1;
        };

        log::debug!(
            "forward stagewise: stopped after {} rounds, max |cor| = {:.6}",
            rounds,
            max_abs_correlation
        );

        let coefficients = Col::from_fn(n_features, |j| {
            let (_, sd) = scaling[j];
            if sd > 0.0 {
                standardized[j] / sd
            } else {
                0.0
            }
        });
        let intercept = y_mean
            - scaling
                .iter()
                .enumerate()
                .map(|(j, &(mean, _))| mean * coefficients[j])
                .sum::<f64>();

        let result = self.compute_statistics(data.as_mat(), y, coefficients, intercept);

        Ok(FittedStagewise {
            options: self.options.clone(),
            result,
            standardized,
            scaling,
            n_rounds: rounds,
            max_abs_correlation,
        })
    }
}

impl ForwardStagewiseRegressor {
    /// Fit statistics for raw-scale coefficients. No inference is produced.
    fn compute_statistics(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        coefficients: Col<f64>,
        intercept: f64,
    ) -> RegressionResult {
        let n = y.nrows();
        let n_features = coefficients.nrows();
        let n_params = n_features + 1;

        let linear = x * &coefficients;
        let fitted_values = Col::from_fn(n, |i| intercept + linear[i]);
        let residuals = y - &fitted_values;

        let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
        let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
        let rss: f64 = residuals.iter().map(|&e| e.powi(2)).sum();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let df_total = (n - 1) as f64;
        let df_resid = n as f64 - n_params as f64;
        let adj_r_squared = if df_resid > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };
        let mse = if df_resid > 0.0 {
            rss / df_resid
        } else {
            f64::NAN
        };

        let mut result = RegressionResult::empty(n_features, n);
        result.coefficients = coefficients;
        result.intercept = Some(intercept);
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.n_parameters = n_params;
        result.n_observations = n;
        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = mse.sqrt();
        result.confidence_level = self.options.confidence_level;
        result
    }
}

/// A fitted forward-stagewise model.
#[derive(Debug, Clone)]
pub struct FittedStagewise {
    options: RegressionOptions,
    result: RegressionResult,
    standardized: Col<f64>,
    scaling: Vec<(f64, f64)>,
    n_rounds: usize,
    max_abs_correlation: f64,
}

impl FittedStagewise {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Coefficients on the standardized predictor scale.
    pub fn standardized_coefficients(&self) -> &Col<f64> {
        &self.standardized
    }

    /// Per-column `(mean, standard deviation)` used for standardization.
    pub fn column_scaling(&self) -> &[(f64, f64)] {
        &self.scaling
    }

    /// Number of rounds taken before stopping.
    pub fn n_rounds(&self) -> usize {
        self.n_rounds
    }

    /// Largest absolute predictor/residual correlation when fitting stopped.
    pub fn max_abs_correlation(&self) -> f64 {
        self.max_abs_correlation
    }

    /// Count non-zero coefficients.
    pub fn n_nonzero(&self) -> usize {
        self.standardized.iter().filter(|&&b| b != 0.0).count()
    }
}

impl FittedRegressor for FittedStagewise {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let intercept = self.result.intercept.unwrap_or(0.0);
        let linear = x * &self.result.coefficients;
        Col::from_fn(x.nrows(), |i| intercept + linear[i])
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `ForwardStagewiseRegressor`.
#[derive(Debug, Clone, Default)]
pub struct ForwardStagewiseRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl ForwardStagewiseRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step size ε added to a coefficient each round.
    pub fn step_size(mut self, epsilon: f64) -> Self {
        self.builder = self.builder.step_size(epsilon);
        self
    }

    /// Set the stopping threshold δ on the maximum absolute correlation.
    pub fn correlation_threshold(mut self, delta: f64) -> Self {
        self.builder = self.builder.correlation_threshold(delta);
        self
    }

    /// Set the maximum number of rounds.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.builder = self.builder.max_iterations(max_iter);
        self
    }

    /// Build the regressor. Options are validated when fitting.
    pub fn build(self) -> ForwardStagewiseRegressor {
        ForwardStagewiseRegressor::new(self.builder.build_unchecked())
    }
}
