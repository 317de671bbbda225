//! Common test utilities, fixtures and data generators.
#![allow(dead_code)]

use faer::{Col, Mat};
use regdiag::DataFrame;

/// Stack-loss predictors: air flow, water temperature, acid concentration.
pub const STACKLOSS_X: [[f64; 3]; 21] = [
    [80.0, 27.0, 89.0],
    [80.0, 27.0, 88.0],
    [75.0, 25.0, 90.0],
    [62.0, 24.0, 87.0],
    [62.0, 22.0, 87.0],
    [62.0, 23.0, 87.0],
    [62.0, 24.0, 93.0],
    [62.0, 24.0, 93.0],
    [58.0, 23.0, 87.0],
    [58.0, 18.0, 80.0],
    [58.0, 18.0, 89.0],
    [58.0, 17.0, 88.0],
    [58.0, 18.0, 82.0],
    [58.0, 19.0, 93.0],
    [50.0, 18.0, 89.0],
    [50.0, 18.0, 86.0],
    [50.0, 19.0, 72.0],
    [50.0, 19.0, 79.0],
    [50.0, 20.0, 80.0],
    [56.0, 20.0, 82.0],
    [70.0, 20.0, 91.0],
];

/// Stack-loss response.
pub const STACKLOSS_Y: [f64; 21] = [
    42.0, 37.0, 37.0, 28.0, 18.0, 18.0, 19.0, 20.0, 15.0, 14.0, 14.0, 13.0, 11.0, 12.0, 8.0, 7.0,
    8.0, 8.0, 9.0, 15.0, 15.0,
];

/// The 21 × 3 stack-loss dataset with labelled columns.
pub fn stackloss() -> (DataFrame, Col<f64>) {
    let values: Vec<f64> = STACKLOSS_X.iter().flatten().copied().collect();
    let data = DataFrame::from_row_major(&values, ["air_flow", "water_temp", "acid_conc"])
        .expect("stack-loss shape is valid");
    let y = Col::from_fn(STACKLOSS_Y.len(), |i| STACKLOSS_Y[i]);
    (data, y)
}

/// Generate simple linear data: y = x * beta + intercept + noise
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    // Simple deterministic "random" for reproducibility
    let mut rng_state = seed;
    let next_rand = |state: &mut u64| -> f64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);
    let true_coefficients = Col::from_fn(n_features, |j| (j + 1) as f64);

    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = next_rand(&mut rng_state);
            yi += x[(i, j)] * true_coefficients[j];
        }
        yi += noise_std * next_rand(&mut rng_state);
        y[i] = yi;
    }

    (x, y, true_coefficients)
}

/// Generate data with collinear features.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let mut x = Mat::zeros(n_samples, 3);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = i as f64;
        x[(i, 1)] = 2.0 * i as f64; // Perfectly collinear with x0
        x[(i, 2)] = (i * i) as f64;
        y[i] = 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)];
    }

    (x, y)
}

/// Five smooth, weakly correlated predictors and a response driven by the
/// first one: y = 4 + 3 x0 + e.
pub fn generate_dominant_predictor_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let x = Mat::from_fn(n_samples, 5, |i, j| {
        ((i + 1) as f64 * (j + 1) as f64 * 0.37 + j as f64).sin() * 2.0 + (j + 1) as f64 * 0.5
    });
    let y = Col::from_fn(n_samples, |i| {
        4.0 + 3.0 * x[(i, 0)] + (i as f64 * 2.3 + 0.3).sin() * 0.8
    });
    (x, y)
}

/// Bitwise snapshot of a container's values.
pub fn frame_bits(data: &DataFrame) -> Vec<u64> {
    let m = data.as_mat();
    let mut bits = Vec::with_capacity(m.nrows() * m.ncols());
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            bits.push(m[(i, j)].to_bits());
        }
    }
    bits
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
