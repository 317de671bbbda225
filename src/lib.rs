//! Ordinary least squares with regression diagnostics.
//!
//! This library fits linear models through a QR factorization of the design
//! matrix and derives post-fit diagnostics from the same factors: leverage,
//! Cook's distance, studentized and PRESS residuals, the coefficient
//! covariance matrix, variance inflation factors, and leave-one-out influence
//! measures (DFFITS, DFBETA, DFBETAS). A forward-stagewise estimator is
//! provided as an alternative fitting procedure.
//!
//! # Example
//!
//! ```rust,ignore
//! use regdiag::prelude::*;
//!
//! let data = DataFrame::from_rows(&rows)?;
//!
//! // Create and fit an OLS model
//! let fitted = OlsRegressor::builder()
//!     .with_intercept(true)
//!     .build()
//!     .fit(&data, &y)?;
//!
//! // Access statistics
//! println!("R² = {}", fitted.result().r_squared);
//!
//! // Diagnostics
//! let leverage = fitted.leverage();
//! let cooks = fitted.cooks_distance();
//! let covariance = fitted.variance_covariance_matrix()?;
//! let dffits = fitted.dffits()?;
//! ```

pub mod core;
pub mod diagnostics;
pub mod inference;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        DataFrame, FrameError, Margin, OptionsError, RegressionOptions, RegressionOptionsBuilder,
        RegressionResult,
    };
    pub use crate::diagnostics::{
        compute_leverage, cooks_distance, externally_studentized_residuals, high_leverage_points,
        high_vif_predictors, influential_cooks, influential_dffits, press_residuals,
        residual_outliers, standardized_residuals, studentized_residuals,
        variance_inflation_factor, InfluenceMeasures,
    };
    pub use crate::solvers::{
        FittedOls, FittedRegressor, FittedStagewise, ForwardStagewiseRegressor, OlsRegressor,
        RegressionError, Regressor,
    };
}

pub use crate::core::{DataFrame, RegressionOptions, RegressionOptionsBuilder, RegressionResult};
pub use crate::solvers::{
    FittedOls, FittedRegressor, FittedStagewise, ForwardStagewiseRegressor, OlsRegressor,
    RegressionError, Regressor,
};
