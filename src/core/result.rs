//! Regression result structures.

use faer::Col;

/// Inference for the intercept of a fit.
#[derive(Debug, Clone, Copy)]
pub struct InterceptInference {
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    /// Confidence bounds (lower, upper).
    pub conf_interval: (f64, f64),
}

/// Standard errors, t tests and confidence bounds for every parameter.
///
/// Vectors follow the predictor columns; the intercept row, if the model has
/// one, is kept separately.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    pub std_errors: Col<f64>,
    pub t_statistics: Col<f64>,
    pub p_values: Col<f64>,
    pub conf_interval_lower: Col<f64>,
    pub conf_interval_upper: Col<f64>,
    pub intercept: Option<InterceptInference>,
}

/// Summary of a regression fit.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    /// Estimated coefficients for the predictor columns (intercept excluded).
    pub coefficients: Col<f64>,
    pub intercept: Option<f64>,
    /// Residuals y - ŷ.
    pub residuals: Col<f64>,
    pub fitted_values: Col<f64>,
    /// Parameter count p, intercept included.
    pub n_parameters: usize,
    pub n_observations: usize,

    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// RSS / (n - p); NaN without residual degrees of freedom.
    pub mse: f64,
    /// Residual standard error, sqrt(MSE).
    pub rmse: f64,
    /// Overall F test against the intercept-only model.
    pub f_statistic: f64,
    pub f_pvalue: f64,

    /// Present when the fit was asked for inference and has residual
    /// degrees of freedom.
    pub inference: Option<CoefficientTable>,
    pub confidence_level: f64,
}

impl RegressionResult {
    /// Placeholder with zeroed vectors, filled in by the solvers.
    pub(crate) fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            n_parameters: 0,
            n_observations,
            r_squared: 0.0,
            adj_r_squared: f64::NAN,
            mse: f64::NAN,
            rmse: f64::NAN,
            f_statistic: f64::NAN,
            f_pvalue: f64::NAN,
            inference: None,
            confidence_level: 0.95,
        }
    }

    /// Standard errors of the predictor coefficients, if computed.
    pub fn std_errors(&self) -> Option<&Col<f64>> {
        self.inference.as_ref().map(|table| &table.std_errors)
    }

    /// Two-sided p-values of the predictor coefficients, if computed.
    pub fn p_values(&self) -> Option<&Col<f64>> {
        self.inference.as_ref().map(|table| &table.p_values)
    }

    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// Total sum of squares of the response (ŷ + e) around its mean.
    pub fn tss(&self) -> f64 {
        let response: Vec<f64> = self
            .fitted_values
            .iter()
            .zip(self.residuals.iter())
            .map(|(&f, &e)| f + e)
            .collect();
        let mean = response.iter().sum::<f64>() / response.len() as f64;
        response.iter().map(|&y| (y - mean).powi(2)).sum()
    }

    /// Residual sum of squares (RSS).
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r.powi(2)).sum()
    }

    /// Explained sum of squares (ESS = TSS - RSS).
    pub fn ess(&self) -> f64 {
        self.tss() - self.rss()
    }
}
