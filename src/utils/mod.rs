//! Shared numeric helpers.

mod matrix;
mod stats;

pub use matrix::{
    back_substitute, build_design_matrix, center_vector, column_norms, invert_upper_triangular,
    outer_gram, thin_qr, triangular_rank,
};
pub use stats::{correlation, mean, normalize, standardize, std_dev, variance};
