//! Ordinary Least Squares regression solver.

use crate::core::{
    CoefficientTable, DataFrame, InterceptInference, RegressionOptions, RegressionOptionsBuilder,
    RegressionResult,
};
use crate::inference::CoefficientInference;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{
    back_substitute, build_design_matrix, column_norms, invert_upper_triangular, outer_gram,
    thin_qr, triangular_rank,
};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::sync::OnceLock;

/// Ordinary Least Squares regression estimator.
///
/// Factors the design matrix as X = QR and solves R β = Qᵀy by
/// back-substitution, so XᵀX is never formed. A rank-deficient design is an
/// error rather than being silently aliased.
///
/// # Example
///
/// ```rust,ignore
/// use regdiag::prelude::*;
///
/// let data = DataFrame::from_rows(&rows)?;
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .build()
///     .fit(&data, &y)?;
///
/// println!("R² = {}", fitted.r_squared());
/// println!("leverage = {:?}", fitted.leverage());
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }

    /// Options this regressor fits with.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, data: &DataFrame, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let (n_samples, _) = data.dimensions();

        if y.nrows() != n_samples {
            return Err(RegressionError::DimensionMismatch {
                x_rows: n_samples,
                y_len: y.nrows(),
            });
        }

        let design = build_design_matrix(data.as_mat(), self.options.with_intercept);
        let n_params = design.ncols();

        if n_params == 0 {
            return Err(RegressionError::EmptyDesign);
        }

        if n_params > n_samples {
            return Err(RegressionError::Underdetermined {
                n_observations: n_samples,
                n_parameters: n_params,
            });
        }

        let (q, r) = thin_qr(&design);

        let rank = triangular_rank(&r, &column_norms(&design), self.options.rank_tolerance);
        if rank < n_params {
            return Err(RegressionError::RankDeficient {
                rank,
                n_parameters: n_params,
            });
        }

        // Solve R * beta = Q' * y
        let qty = q.transpose() * y;
        let parameters = back_substitute(&r, &qty).ok_or(RegressionError::SingularMatrix)?;

        let fitted_values = &design * &parameters;
        let residuals = y - &fitted_values;

        let result = self.compute_statistics(y, &r, &parameters, residuals, fitted_values);

        log::debug!(
            "ols fit: n={}, p={}, r_squared={:.6}, mse={:.6}",
            n_samples,
            n_params,
            result.r_squared,
            result.mse
        );

        Ok(FittedOls {
            options: self.options.clone(),
            data: data.clone(),
            response: y.clone(),
            design,
            q,
            r,
            parameters,
            result,
            hat: OnceLock::new(),
        })
    }
}

impl OlsRegressor {
    /// Compute fit statistics and optionally inference statistics.
    fn compute_statistics(
        &self,
        y: &Col<f64>,
        r: &Mat<f64>,
        parameters: &Col<f64>,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
    ) -> RegressionResult {
        let n = y.nrows();
        let n_params = parameters.nrows();
        let with_intercept = self.options.with_intercept;

        let y_mean: f64 = y.iter().sum::<f64>() / n as f64;

        // TSS always uses the mean-centered response
        let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
        let rss: f64 = residuals.iter().map(|&e| e.powi(2)).sum();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = (n - 1) as f64;
        let df_resid = (n - n_params) as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 {
            rss / df_resid
        } else {
            f64::NAN
        };
        let rmse = mse.sqrt();

        let ess = tss - rss;
        let df_model = (n_params - usize::from(with_intercept)) as f64;
        let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
            (ess / df_model) / mse
        } else {
            f64::NAN
        };

        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
        } else {
            f64::NAN
        };

        let (intercept, coefficients) = split_intercept(parameters, with_intercept);

        let mut result = RegressionResult::empty(coefficients.nrows(), n);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.n_parameters = n_params;
        result.n_observations = n;
        result.r_squared = r_squared;
        result.adj_r_squared = adj_r_squared;
        result.mse = mse;
        result.rmse = rmse;
        result.f_statistic = f_statistic;
        result.f_pvalue = f_pvalue;
        result.confidence_level = self.options.confidence_level;

        if self.options.compute_inference && df_resid > 0.0 && mse.is_finite() {
            self.compute_inference(r, parameters, df_resid, &mut result);
        }

        result
    }

    /// Compute inference statistics (standard errors, t-stats, p-values, CIs).
    fn compute_inference(
        &self,
        r: &Mat<f64>,
        parameters: &Col<f64>,
        df: f64,
        result: &mut RegressionResult,
    ) {
        let Some(r_inv) = invert_upper_triangular(r) else {
            log::warn!("ols inference skipped: R factor is not invertible");
            return;
        };
        let unscaled = outer_gram(&r_inv);

        let se = CoefficientInference::standard_errors(&unscaled, result.mse);
        let t_stats = CoefficientInference::t_statistics(parameters, &se);
        let p_vals = CoefficientInference::p_values(&t_stats, df);
        let (ci_lower, ci_upper) = CoefficientInference::confidence_intervals(
            parameters,
            &se,
            df,
            self.options.confidence_level,
        );

        let with_intercept = self.options.with_intercept;
        let (se_int, std_errors) = split_intercept(&se, with_intercept);
        let (t_int, t_statistics) = split_intercept(&t_stats, with_intercept);
        let (p_int, p_values) = split_intercept(&p_vals, with_intercept);
        let (lo_int, conf_interval_lower) = split_intercept(&ci_lower, with_intercept);
        let (hi_int, conf_interval_upper) = split_intercept(&ci_upper, with_intercept);

        let intercept = match (se_int, t_int, p_int, lo_int, hi_int) {
            (Some(std_error), Some(t_statistic), Some(p_value), Some(lo), Some(hi)) => {
                Some(InterceptInference {
                    std_error,
                    t_statistic,
                    p_value,
                    conf_interval: (lo, hi),
                })
            }
            _ => None,
        };

        result.inference = Some(CoefficientTable {
            std_errors,
            t_statistics,
            p_values,
            conf_interval_lower,
            conf_interval_upper,
            intercept,
        });
    }
}

/// Split a parameter-length vector into (intercept entry, predictor entries).
fn split_intercept(values: &Col<f64>, with_intercept: bool) -> (Option<f64>, Col<f64>) {
    if with_intercept {
        let rest = Col::from_fn(values.nrows() - 1, |j| values[j + 1]);
        (Some(values[0]), rest)
    } else {
        (None, values.clone())
    }
}

/// A fitted OLS regression model.
///
/// Owns a private copy of the training container and response together with
/// the QR factors of the design matrix, so every diagnostic can be derived
/// without factorizing again. The hat matrix is built on first use and cached for
/// the lifetime of this fit; refitting yields a new `FittedOls` and therefore
/// a fresh cache.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    data: DataFrame,
    response: Col<f64>,
    design: Mat<f64>,
    q: Mat<f64>,
    r: Mat<f64>,
    parameters: Col<f64>,
    result: RegressionResult,
    hat: OnceLock<Mat<f64>>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// The training container.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// The training response.
    pub fn response(&self) -> &Col<f64> {
        &self.response
    }

    /// The design matrix (`[1 | X]` when fit with an intercept).
    pub fn design_matrix(&self) -> &Mat<f64> {
        &self.design
    }

    /// Full parameter vector, intercept first when present.
    pub fn parameters(&self) -> &Col<f64> {
        &self.parameters
    }

    /// Number of parameters p (including the intercept).
    pub fn n_parameters(&self) -> usize {
        self.parameters.nrows()
    }

    /// Number of observations n.
    pub fn n_observations(&self) -> usize {
        self.response.nrows()
    }

    /// Mean squared error, RSS / (n - p).
    pub fn mean_squared_error(&self) -> f64 {
        self.result.mse
    }

    /// Thin orthonormal factor Q (n × p).
    pub fn q_factor(&self) -> &Mat<f64> {
        &self.q
    }

    /// Upper-triangular factor R (p × p).
    pub fn r_factor(&self) -> &Mat<f64> {
        &self.r
    }

    /// The cached hat matrix slot.
    pub(crate) fn hat_cache(&self) -> &OnceLock<Mat<f64>> {
        &self.hat
    }

    /// Predict a single raw predictor row (without the intercept entry).
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let offset = usize::from(self.options.with_intercept);
        let base = if offset == 1 { self.parameters[0] } else { 0.0 };

        row.iter()
            .enumerate()
            .fold(base, |acc, (j, &x)| acc + x * self.parameters[j + offset])
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let intercept = self.result.intercept.unwrap_or(0.0);
        let linear = x * &self.result.coefficients;
        Col::from_fn(x.nrows(), |i| intercept + linear[i])
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the OLS regressor. Options are validated when fitting.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
