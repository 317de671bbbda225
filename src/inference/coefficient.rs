//! Coefficient inference calculations.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression parameters.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Compute standard errors from the unscaled covariance `(X'X)^(-1)`.
    ///
    /// SE(β_j) = sqrt(σ² * (X'X)^(-1)_{jj})
    pub fn standard_errors(unscaled_covariance: &Mat<f64>, mse: f64) -> Col<f64> {
        let p = unscaled_covariance.nrows();

        Col::from_fn(p, |j| {
            let var = mse * unscaled_covariance[(j, j)];
            if var >= 0.0 && var.is_finite() {
                var.sqrt()
            } else {
                f64::NAN
            }
        })
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Compute p-values from t-statistics.
    ///
    /// p_j = 2 * P(|T| > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let n = t_statistics.nrows();

        let t_dist = if df > 0.0 {
            StudentsT::new(0.0, 1.0, df).ok()
        } else {
            None
        };

        match t_dist {
            Some(dist) => Col::from_fn(n, |j| {
                if t_statistics[j].is_nan() {
                    f64::NAN
                } else {
                    // Two-tailed test
                    2.0 * (1.0 - dist.cdf(t_statistics[j].abs()))
                }
            }),
            None => Col::from_fn(n, |_| f64::NAN),
        }
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let t_crit = Self::critical_value(df, confidence_level);

        let lower = Col::from_fn(n, |j| coefficients[j] - t_crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + t_crit * std_errors[j]);

        (lower, upper)
    }

    /// Two-sided Student-t critical value; NaN when `df <= 0`.
    pub fn critical_value(df: f64, confidence_level: f64) -> f64 {
        if df <= 0.0 {
            return f64::NAN;
        }
        let alpha = 1.0 - confidence_level;
        StudentsT::new(0.0, 1.0, df).map_or(f64::NAN, |d| d.inverse_cdf(1.0 - alpha / 2.0))
    }
}
