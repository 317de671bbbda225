//! Diagnostics attached to a fitted OLS model.

use super::influence::{cooks_distance, dffits_from_leverage};
use super::leave_one_out::{
    dfbeta_from_fits, dfbetas_from_dfbeta, dffits_from_fits, leave_one_out_fits, row_norms,
    InfluenceMeasures,
};
use super::leverage::{
    hat_matrix_from_q, high_leverage_points, high_leverage_threshold, leverage_from_q,
};
use super::residuals::{
    externally_studentized_residuals, press_residuals, press_statistic, standardized_residuals,
    studentized_residuals,
};
use super::vif::variance_inflation_factor;
use crate::solvers::{FittedOls, FittedRegressor, RegressionError};
use crate::utils::{invert_upper_triangular, outer_gram};
use faer::{Col, Mat};

impl FittedOls {
    /// The n × n hat matrix H = Q Qᵀ.
    ///
    /// Built on first use and cached for the lifetime of this fit.
    pub fn hat_matrix(&self) -> &Mat<f64> {
        self.hat_cache()
            .get_or_init(|| hat_matrix_from_q(self.q_factor()))
    }

    /// Leverage values h_ii, the diagonal of the hat matrix.
    ///
    /// Read off the rows of Q in O(np); the n × n matrix is never built.
    pub fn leverage(&self) -> Col<f64> {
        leverage_from_q(self.q_factor())
    }

    /// High-leverage cutoff 2p/n.
    pub fn high_leverage_threshold(&self) -> f64 {
        high_leverage_threshold(self.n_parameters(), self.n_observations())
    }

    /// Observations whose leverage exceeds 2p/n.
    pub fn high_leverage_points(&self) -> Vec<usize> {
        high_leverage_points(&self.leverage(), self.n_parameters(), None)
    }

    /// Cook's distance for every observation.
    pub fn cooks_distance(&self) -> Col<f64> {
        let result = self.result();
        cooks_distance(
            &result.residuals,
            &self.leverage(),
            result.mse,
            self.n_parameters(),
        )
    }

    /// Residuals divided by sqrt(MSE).
    pub fn standardized_residuals(&self) -> Col<f64> {
        let result = self.result();
        standardized_residuals(&result.residuals, result.mse)
    }

    /// Internally studentized residuals e_i / (sqrt(MSE) sqrt(1 - h_ii)).
    pub fn studentized_residuals(&self) -> Col<f64> {
        let result = self.result();
        studentized_residuals(&result.residuals, &self.leverage(), result.mse)
    }

    /// Externally studentized residuals using the leave-one-out MSE.
    pub fn externally_studentized_residuals(&self) -> Col<f64> {
        let result = self.result();
        externally_studentized_residuals(
            &result.residuals,
            &self.leverage(),
            result.mse,
            self.n_parameters(),
        )
    }

    /// PRESS residuals e_i / (1 - h_ii).
    pub fn press_residuals(&self) -> Col<f64> {
        press_residuals(&self.result().residuals, &self.leverage())
    }

    /// Sum of squared PRESS residuals.
    pub fn press_statistic(&self) -> f64 {
        press_statistic(&self.press_residuals())
    }

    /// Predicted R², 1 - PRESS / TSS.
    pub fn predicted_r_squared(&self) -> f64 {
        let tss = self.result().tss();
        if tss > 0.0 {
            1.0 - self.press_statistic() / tss
        } else {
            f64::NAN
        }
    }

    /// (XᵀX)⁻¹ computed as R⁻¹R⁻ᵀ from the cached R factor.
    ///
    /// # Errors
    /// `SingularMatrix` if R cannot be inverted.
    pub fn unscaled_covariance(&self) -> Result<Mat<f64>, RegressionError> {
        let r_inv =
            invert_upper_triangular(self.r_factor()).ok_or(RegressionError::SingularMatrix)?;
        Ok(outer_gram(&r_inv))
    }

    /// Estimated coefficient covariance MSE · (XᵀX)⁻¹, p × p.
    ///
    /// Rows and columns follow the parameter order (intercept first).
    ///
    /// # Errors
    /// `SingularMatrix` if R cannot be inverted.
    pub fn variance_covariance_matrix(&self) -> Result<Mat<f64>, RegressionError> {
        let unscaled = self.unscaled_covariance()?;
        let mse = self.mean_squared_error();
        let p = unscaled.nrows();
        Ok(Mat::from_fn(p, p, |i, j| mse * unscaled[(i, j)]))
    }

    /// VIF for each predictor column of the training container.
    pub fn variance_inflation_factors(&self) -> Result<Col<f64>, RegressionError> {
        variance_inflation_factor(self.data(), self.options().rank_tolerance)
    }

    /// DFFITS from n leave-one-out refits.
    ///
    /// # Errors
    /// `InsufficientObservations` unless n > p + 1, or the first failing refit.
    pub fn dffits(&self) -> Result<Col<f64>, RegressionError> {
        let fits = leave_one_out_fits(self)?;
        Ok(dffits_from_fits(
            &self.result().fitted_values,
            &self.leverage(),
            &fits,
        ))
    }

    /// DFFITS in closed form from leverage, without refitting.
    pub fn dffits_closed_form(&self) -> Col<f64> {
        let result = self.result();
        dffits_from_leverage(
            &result.residuals,
            &self.leverage(),
            result.mse,
            self.n_parameters(),
        )
    }

    /// DFBETA matrix (n × p): row i is β - β₍ᵢ₎.
    ///
    /// # Errors
    /// `InsufficientObservations` unless n > p + 1, or the first failing refit.
    pub fn dfbeta(&self) -> Result<Mat<f64>, RegressionError> {
        let fits = leave_one_out_fits(self)?;
        Ok(dfbeta_from_fits(self.parameters(), &fits))
    }

    /// One scalar per observation: the Euclidean norm of its DFBETA row.
    pub fn dfbeta_norms(&self) -> Result<Col<f64>, RegressionError> {
        Ok(row_norms(&self.dfbeta()?))
    }

    /// DFBETAS matrix (n × p).
    pub fn dfbetas(&self) -> Result<Mat<f64>, RegressionError> {
        Ok(self.influence_measures()?.dfbetas)
    }

    /// DFFITS, DFBETA and DFBETAS from one leave-one-out pass.
    pub fn influence_measures(&self) -> Result<InfluenceMeasures, RegressionError> {
        let unscaled = self.unscaled_covariance()?;
        let fits = leave_one_out_fits(self)?;

        let dffits = dffits_from_fits(&self.result().fitted_values, &self.leverage(), &fits);
        let dfbeta = dfbeta_from_fits(self.parameters(), &fits);
        let dfbetas = dfbetas_from_dfbeta(&dfbeta, &unscaled, &fits);

        Ok(InfluenceMeasures {
            dffits,
            dfbeta,
            dfbetas,
        })
    }
}
