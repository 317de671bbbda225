//! Regression diagnostics (leverage, Cook's distance, VIF, etc.).
//!
//! This module provides tools for diagnosing regression models:
//!
//! - **Leverage**: Identifies observations with unusual predictor values
//! - **Residuals**: Standardized, studentized and PRESS residuals
//! - **Influence**: Cook's distance, DFFITS and DFBETA(S)
//! - **VIF**: Variance Inflation Factor for multicollinearity detection
//!
//! The free functions work on plain vectors. `FittedOls` exposes the same
//! quantities as methods that reuse the QR factors of the fit.
//!
//! # Example
//!
//! ```rust,ignore
//! use regdiag::prelude::*;
//!
//! let fitted = OlsRegressor::builder().build().fit(&data, &y)?;
//!
//! let leverage = fitted.leverage();
//! let cooks = fitted.cooks_distance();
//! let vif = fitted.variance_inflation_factors()?;
//! let influence = fitted.influence_measures()?;
//!
//! // Identify problematic observations
//! let high_leverage = fitted.high_leverage_points();
//! let influential = influential_cooks(&cooks, None);
//! let unstable = influential_dffits(&influence.dffits, None);
//! let collinear = high_vif_predictors(&vif, 5.0);
//! ```

mod fitted;
mod influence;
mod leave_one_out;
mod leverage;
mod residuals;
mod vif;

pub use influence::{cooks_distance, dffits_from_leverage, influential_cooks, influential_dffits};
pub use leave_one_out::{
    dfbeta_from_fits, dfbetas_from_dfbeta, dffits_from_fits, leave_one_out_fits, row_norms,
    InfluenceMeasures, LeaveOneOutFit,
};
pub use leverage::{
    compute_leverage, hat_matrix_from_q, high_leverage_points, high_leverage_threshold,
    leverage_from_q,
};
pub use residuals::{
    externally_studentized_residuals, press_residuals, press_statistic, residual_outliers,
    standardized_residuals, studentized_residuals,
};
pub use vif::{high_vif_predictors, variance_inflation_factor};
