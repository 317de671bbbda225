//! Regression solvers implementing the available estimation methods.

mod traits;
mod ols;
mod stagewise;

pub use traits::{FittedRegressor, Regressor, RegressionError};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use stagewise::{
    ForwardStagewiseRegressor, ForwardStagewiseRegressorBuilder, FittedStagewise,
};
