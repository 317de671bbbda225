//! Diagnostics integration tests.

mod common;

use approx::assert_relative_eq;
use faer::{Col, Mat};
use regdiag::diagnostics::{
    compute_leverage, high_vif_predictors, influential_cooks, influential_dffits,
    residual_outliers, variance_inflation_factor,
};
use regdiag::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use regdiag::DataFrame;

fn fit_stackloss() -> FittedOls {
    let (data, y) = common::stackloss();
    OlsRegressor::builder()
        .build()
        .fit(&data, &y)
        .expect("fit should succeed")
}

// ============================================================================
// Leverage Tests
// ============================================================================

#[test]
fn test_stackloss_leverage() {
    let fitted = fit_stackloss();
    let leverage = fitted.leverage();

    assert_eq!(leverage.nrows(), 21);
    assert_relative_eq!(leverage[0], 0.302, epsilon = 1e-3);
    assert_relative_eq!(leverage[1], 0.318, epsilon = 1e-3);
    assert_relative_eq!(leverage[16], 0.412123, epsilon = 1e-5);
    assert_relative_eq!(leverage[20], 0.285, epsilon = 1e-3);
}

#[test]
fn test_leverage_bounds_and_sum() {
    let (x, y, _) = common::generate_linear_data(40, 3, 1.0, 0.5, 11);
    let fitted = OlsRegressor::builder()
        .build()
        .fit(&DataFrame::new(x.clone()), &y)
        .expect("fit should succeed");

    let leverage = fitted.leverage();
    for i in 0..leverage.nrows() {
        assert!(leverage[i] >= 0.0 && leverage[i] <= 1.0);
    }
    let sum: f64 = leverage.iter().sum();
    assert_relative_eq!(sum, 4.0, epsilon = 1e-9);

    // Free function agrees with the fitted model
    let direct = compute_leverage(&x, true, 1e-10).expect("full rank");
    for i in 0..leverage.nrows() {
        assert_relative_eq!(direct[i], leverage[i], epsilon = 1e-10);
    }
}

#[test]
fn test_stackloss_high_leverage() {
    let fitted = fit_stackloss();

    assert_relative_eq!(fitted.high_leverage_threshold(), 8.0 / 21.0, epsilon = 1e-15);
    assert_eq!(fitted.high_leverage_points(), vec![16]);
}

#[test]
fn test_hat_matrix_symmetric_projection() {
    let fitted = fit_stackloss();
    let hat = fitted.hat_matrix();
    let response = fitted.response();

    for i in 0..21 {
        for j in 0..21 {
            assert_relative_eq!(hat[(i, j)], hat[(j, i)], epsilon = 1e-12);
        }
        // H y reproduces the fitted values
        let projected: f64 = (0..21).map(|k| hat[(i, k)] * response[k]).sum();
        assert_relative_eq!(projected, fitted.result().fitted_values[i], epsilon = 1e-8);
    }
}

#[test]
fn test_refit_gets_fresh_hat_matrix() {
    let (data, y) = common::stackloss();
    let model = OlsRegressor::builder().build();

    let full = model.fit(&data, &y).expect("fit should succeed");
    let reduced_data = data.remove_row(0).expect("row exists");
    let reduced_y = Col::from_fn(20, |i| y[i + 1]);
    let reduced = model
        .fit(&reduced_data, &reduced_y)
        .expect("fit should succeed");

    assert_eq!(full.hat_matrix().nrows(), 21);
    assert_eq!(reduced.hat_matrix().nrows(), 20);
    assert_relative_eq!(reduced.leverage().iter().sum::<f64>(), 4.0, epsilon = 1e-9);
}

// ============================================================================
// Cook's Distance Tests
// ============================================================================

#[test]
fn test_stackloss_cooks_distance() {
    let fitted = fit_stackloss();
    let cooks = fitted.cooks_distance();

    assert_relative_eq!(cooks[0], 0.154, epsilon = 1e-3);
    assert_relative_eq!(cooks[1], 0.060, epsilon = 1e-3);
    assert_relative_eq!(cooks[20], 0.692, epsilon = 1e-3);

    assert_eq!(influential_cooks(&cooks, None), vec![20]);
}

// ============================================================================
// Residual Diagnostics Tests
// ============================================================================

#[test]
fn test_stackloss_studentized_residuals() {
    let fitted = fit_stackloss();
    let studentized = fitted.studentized_residuals();

    assert_relative_eq!(studentized[0], 1.193, epsilon = 1e-3);
    assert_relative_eq!(studentized[1], -0.716, epsilon = 1e-3);
    assert_relative_eq!(studentized[20], -2.638, epsilon = 1e-3);

    assert_eq!(residual_outliers(&studentized, 2.0), vec![20]);
}

#[test]
fn test_stackloss_standardized_and_external_residuals() {
    let fitted = fit_stackloss();

    let standardized = fitted.standardized_residuals();
    assert_relative_eq!(standardized[0], 0.997309, epsilon = 1e-5);

    let external = fitted.externally_studentized_residuals();
    assert_relative_eq!(external[0], 1.209475, epsilon = 1e-5);
    assert_relative_eq!(external[20], -3.330493, epsilon = 1e-5);
}

#[test]
fn test_fitted_plus_residuals_equals_response() {
    let fitted = fit_stackloss();
    let result = fitted.result();

    for i in 0..21 {
        assert_relative_eq!(
            result.fitted_values[i] + result.residuals[i],
            common::STACKLOSS_Y[i],
            epsilon = 1e-10
        );
    }
}

// ============================================================================
// PRESS Tests
// ============================================================================

#[test]
fn test_press_matches_brute_force_leave_one_out() {
    let x = [1.0, 2.0, 4.0, 5.0, 7.0];
    let y_values = [1.2, 1.9, 4.3, 4.8, 7.5];

    let data = DataFrame::from_columns(&[x]).expect("valid column");
    let y = Col::from_fn(5, |i| y_values[i]);
    let model = OlsRegressor::builder().build();
    let fitted = model.fit(&data, &y).expect("fit should succeed");

    let press = fitted.press_residuals();
    assert_eq!(fitted.n_parameters(), 2);

    for i in 0..5 {
        let reduced = data.remove_row(i).expect("row exists");
        let reduced_y = Col::from_fn(4, |k| y_values[if k < i { k } else { k + 1 }]);
        let loo = model.fit(&reduced, &reduced_y).expect("fit should succeed");

        let prediction_error = y_values[i] - loo.predict_row(&[x[i]]);
        assert_relative_eq!(press[i], prediction_error, epsilon = 1e-10);
    }
}

#[test]
fn test_stackloss_press_statistic() {
    let fitted = fit_stackloss();

    assert_relative_eq!(fitted.press_residuals()[0], 4.631201, epsilon = 1e-5);
    assert_relative_eq!(fitted.press_statistic(), 291.868932, epsilon = 1e-4);
    assert_relative_eq!(fitted.predicted_r_squared(), 0.858949, epsilon = 1e-5);
}

// ============================================================================
// Variance-Covariance Tests
// ============================================================================

#[test]
fn test_stackloss_variance_covariance_matrix() {
    let fitted = fit_stackloss();
    let vc = fitted
        .variance_covariance_matrix()
        .expect("R should be invertible");

    assert_eq!(vc.nrows(), 4);
    assert_eq!(vc.ncols(), 4);
    assert_relative_eq!(vc[(0, 0)], 141.515, epsilon = 1e-3);
    assert_relative_eq!(vc[(0, 1)], 0.287587, epsilon = 1e-5);
    assert_relative_eq!(vc[(1, 1)], 0.018187, epsilon = 1e-6);
    assert_relative_eq!(vc[(2, 2)], 0.135442, epsilon = 1e-6);
    assert_relative_eq!(vc[(3, 3)], 0.024428, epsilon = 1e-6);

    for i in 0..4 {
        for j in 0..4 {
            assert_relative_eq!(vc[(i, j)], vc[(j, i)], epsilon = 1e-12);
        }
    }

    // Diagonal agrees with the reported standard errors
    let se = fitted.result().std_errors().expect("standard errors");
    for j in 0..3 {
        assert_relative_eq!(vc[(j + 1, j + 1)].sqrt(), se[j], epsilon = 1e-10);
    }
}

#[test]
fn test_unscaled_covariance_is_xtx_inverse() {
    let fitted = fit_stackloss();
    let unscaled = fitted.unscaled_covariance().expect("R should be invertible");
    let design = fitted.design_matrix();

    // (XᵀX) (XᵀX)⁻¹ = I
    for i in 0..4 {
        for j in 0..4 {
            let mut value = 0.0;
            for k in 0..4 {
                let xtx_ik: f64 = (0..21).map(|r| design[(r, i)] * design[(r, k)]).sum();
                value += xtx_ik * unscaled[(k, j)];
            }
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_relative_eq!(value, expected, epsilon = 1e-4);
        }
    }
}

// ============================================================================
// VIF Tests
// ============================================================================

#[test]
fn test_stackloss_vif() {
    let fitted = fit_stackloss();
    let vif = fitted
        .variance_inflation_factors()
        .expect("auxiliary fits succeed");

    assert_eq!(vif.nrows(), 3);
    assert_relative_eq!(vif[0], 2.906484, epsilon = 1e-5);
    assert_relative_eq!(vif[1], 2.572632, epsilon = 1e-5);
    assert_relative_eq!(vif[2], 1.333587, epsilon = 1e-5);

    for j in 0..3 {
        assert!(vif[j] >= 1.0);
    }
    assert!(high_vif_predictors(&vif, 5.0).is_empty());
}

#[test]
fn test_vif_near_collinear_column() {
    let x = Mat::from_fn(50, 3, |i, j| {
        let t = i as f64;
        match j {
            0 => (t * 0.7).sin() * 3.0,
            1 => (t * 0.3).cos(),
            _ => (t * 0.7).sin() * 3.0 + 0.001 * (t * 1.9).sin(),
        }
    });

    let vif = variance_inflation_factor(&DataFrame::new(x), 1e-10).expect("vif");
    assert!(vif[2] > 1000.0, "VIF[2] = {} should exceed 1000", vif[2]);
    assert!(vif[0] > 1000.0, "VIF[0] = {} should exceed 1000", vif[0]);
    assert!(vif[1] >= 1.0 && vif[1] < 10.0);
}

#[test]
fn test_vif_leaves_data_untouched_on_error() {
    // Column 2 is exactly twice column 1, so regressing column 0 on the
    // others is rank deficient.
    let x = Mat::from_fn(12, 3, |i, j| {
        let t = i as f64;
        match j {
            0 => (t * 0.5).sin(),
            1 => t,
            _ => 2.0 * t,
        }
    });
    let data = DataFrame::new(x);
    let before = common::frame_bits(&data);

    let result = variance_inflation_factor(&data, 1e-10);
    assert!(matches!(result, Err(RegressionError::RankDeficient { .. })));
    assert_eq!(common::frame_bits(&data), before);
}

#[test]
fn test_vif_leaves_data_untouched() {
    let fitted = fit_stackloss();
    let before = common::frame_bits(fitted.data());

    fitted
        .variance_inflation_factors()
        .expect("auxiliary fits succeed");
    assert_eq!(common::frame_bits(fitted.data()), before);
}

// ============================================================================
// DFFITS / DFBETA Tests
// ============================================================================

#[test]
fn test_stackloss_dffits() {
    let fitted = fit_stackloss();
    let dffits = fitted.dffits().expect("enough observations");

    assert_eq!(dffits.nrows(), 21);
    assert_relative_eq!(dffits[0], 0.794721, epsilon = 1e-5);
    assert_relative_eq!(dffits[1], -0.481323, epsilon = 1e-5);
    assert_relative_eq!(dffits[20], -2.100296, epsilon = 1e-5);

    assert_eq!(influential_dffits(&dffits, None), vec![20]);
}

#[test]
fn test_dffits_matches_brute_force_and_closed_form() {
    let (data, y) = common::stackloss();
    let model = OlsRegressor::builder().build();
    let fitted = model.fit(&data, &y).expect("fit should succeed");

    let dffits = fitted.dffits().expect("enough observations");
    let closed = fitted.dffits_closed_form();
    let leverage = fitted.leverage();

    for i in [0, 3, 16, 20] {
        let reduced = data.remove_row(i).expect("row exists");
        let reduced_y = Col::from_fn(20, |k| y[if k < i { k } else { k + 1 }]);
        let loo = model.fit(&reduced, &reduced_y).expect("fit should succeed");

        let row = data.row(i).expect("row exists");
        let expected = (fitted.result().fitted_values[i] - loo.predict_row(&row))
            / (loo.mean_squared_error() * leverage[i]).sqrt();

        assert_relative_eq!(dffits[i], expected, epsilon = 1e-10);
        assert_relative_eq!(dffits[i], closed[i], epsilon = 1e-8);
    }
}

#[test]
fn test_stackloss_dfbeta() {
    let fitted = fit_stackloss();
    let dfbeta = fitted.dfbeta().expect("enough observations");

    assert_eq!(dfbeta.nrows(), 21);
    assert_eq!(dfbeta.ncols(), 4);

    let row0 = [-0.999061, 0.053255, 0.037516, -0.032333];
    let row20 = [3.784357, -0.173468, 0.478666, -0.044981];
    for j in 0..4 {
        assert_relative_eq!(dfbeta[(0, j)], row0[j], epsilon = 1e-5);
        assert_relative_eq!(dfbeta[(20, j)], row20[j], epsilon = 1e-5);
    }

    let norms = fitted.dfbeta_norms().expect("enough observations");
    assert_relative_eq!(norms[0], 1.001705, epsilon = 1e-5);
}

#[test]
fn test_stackloss_influence_measures() {
    let fitted = fit_stackloss();
    let measures = fitted.influence_measures().expect("enough observations");

    assert_relative_eq!(measures.dffits[20], -2.100296, epsilon = 1e-5);

    let row20 = [0.401595, -1.623826, 1.641927, -0.363317];
    for j in 0..4 {
        assert_relative_eq!(measures.dfbetas[(20, j)], row20[j], epsilon = 1e-5);
    }

    let dfbetas = fitted.dfbetas().expect("enough observations");
    assert_relative_eq!(dfbetas[(0, 0)], measures.dfbetas[(0, 0)], epsilon = 1e-12);
}

#[test]
fn test_leave_one_out_insufficient_observations() {
    let x = Mat::from_fn(3, 1, |i, _| i as f64);
    let y = Col::from_fn(3, |i| (i * i) as f64);

    let fitted = OlsRegressor::builder()
        .build()
        .fit(&DataFrame::new(x), &y)
        .expect("fit should succeed");

    assert!(matches!(
        fitted.dffits(),
        Err(RegressionError::InsufficientObservations { needed: 4, got: 3 })
    ));
    assert!(matches!(
        fitted.dfbeta(),
        Err(RegressionError::InsufficientObservations { needed: 4, got: 3 })
    ));
}

#[test]
fn test_leave_one_out_failure_is_reported_and_data_untouched() {
    // Only the last row has a non-zero indicator; dropping it leaves a zero column.
    let x = Mat::from_fn(6, 1, |i, _| if i == 5 { 1.0 } else { 0.0 });
    let y = Col::from_fn(6, |i| 1.0 + 0.1 * i as f64);

    let fitted = OlsRegressor::builder()
        .build()
        .fit(&DataFrame::new(x), &y)
        .expect("fit should succeed");
    let before = common::frame_bits(fitted.data());

    let dffits = fitted.dffits();
    assert!(matches!(dffits, Err(RegressionError::RankDeficient { .. })));

    let dfbeta = fitted.dfbeta();
    assert!(matches!(dfbeta, Err(RegressionError::RankDeficient { .. })));

    assert_eq!(common::frame_bits(fitted.data()), before);
}

#[test]
fn test_leave_one_out_leaves_data_untouched() {
    let fitted = fit_stackloss();
    let data_before = common::frame_bits(fitted.data());
    let response_before: Vec<u64> = fitted.response().iter().map(|v| v.to_bits()).collect();

    fitted.dffits().expect("enough observations");
    fitted.dfbeta().expect("enough observations");

    assert_eq!(common::frame_bits(fitted.data()), data_before);
    let response_after: Vec<u64> = fitted.response().iter().map(|v| v.to_bits()).collect();
    assert_eq!(response_after, response_before);
}
