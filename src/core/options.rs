//! Regression options and configuration.

use thiserror::Error;

/// Configuration options shared by the estimators in this crate.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    ///
    /// When set, the design matrix is `[1 | X]` and every parameter count
    /// includes the intercept.
    pub with_intercept: bool,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Relative rank tolerance for the QR factorization.
    ///
    /// A diagonal entry of R with `|R_ii| <= rank_tolerance * max_j |R_jj|`
    /// marks the design as rank deficient.
    pub rank_tolerance: f64,
    /// Forward-stagewise step size (epsilon).
    pub step_size: f64,
    /// Forward-stagewise stopping threshold on the maximum absolute
    /// correlation between any predictor and the current residual (delta).
    pub correlation_threshold: f64,
    /// Maximum number of forward-stagewise rounds before giving up.
    pub max_iterations: usize,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
            step_size: 0.01,
            correlation_threshold: 0.01,
            max_iterations: 100_000,
        }
    }
}

/// Errors that can occur when validating regression options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("rank_tolerance must be non-negative and finite, got {0}")]
    InvalidRankTolerance(f64),
    #[error("step_size must be positive and finite, got {0}")]
    InvalidStepSize(f64),
    #[error("correlation_threshold must be positive and finite, got {0}")]
    InvalidCorrelationThreshold(f64),
    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Create default options for OLS regression.
    pub fn ols() -> Self {
        Self::default()
    }

    /// Create options for forward-stagewise fitting with the given step size
    /// and correlation threshold.
    pub fn stagewise(step_size: f64, correlation_threshold: f64) -> Self {
        Self {
            step_size,
            correlation_threshold,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if !(self.rank_tolerance >= 0.0 && self.rank_tolerance.is_finite()) {
            return Err(OptionsError::InvalidRankTolerance(self.rank_tolerance));
        }
        if !(self.step_size > 0.0 && self.step_size.is_finite()) {
            return Err(OptionsError::InvalidStepSize(self.step_size));
        }
        if !(self.correlation_threshold > 0.0 && self.correlation_threshold.is_finite()) {
            return Err(OptionsError::InvalidCorrelationThreshold(
                self.correlation_threshold,
            ));
        }
        if self.max_iterations < 1 {
            return Err(OptionsError::InvalidMaxIterations(self.max_iterations));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Set the forward-stagewise step size.
    pub fn step_size(mut self, epsilon: f64) -> Self {
        self.options.step_size = epsilon;
        self
    }

    /// Set the forward-stagewise correlation threshold.
    pub fn correlation_threshold(mut self, delta: f64) -> Self {
        self.options.correlation_threshold = delta;
        self
    }

    /// Set the maximum number of forward-stagewise rounds.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}
