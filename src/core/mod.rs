//! Core types for regression analysis.

mod frame;
mod options;
mod result;

pub use frame::{DataFrame, FrameError, Margin};
pub use options::{OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use result::{CoefficientTable, InterceptInference, RegressionResult};
