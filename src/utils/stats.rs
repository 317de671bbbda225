//! Summary statistics over faer column vectors.

use faer::Col;

/// Arithmetic mean. Returns NaN for an empty vector.
pub fn mean(x: &Col<f64>) -> f64 {
    let n = x.nrows();
    if n == 0 {
        return f64::NAN;
    }
    x.iter().sum::<f64>() / n as f64
}

/// Sample variance with the `n - 1` denominator.
pub fn variance(x: &Col<f64>) -> f64 {
    let n = x.nrows();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(x);
    x.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation.
pub fn std_dev(x: &Col<f64>) -> f64 {
    variance(x).sqrt()
}

/// Pearson correlation coefficient.
///
/// Returns 0.0 when either vector has zero spread, so a constant predictor
/// or an exhausted residual never looks correlated.
pub fn correlation(x: &Col<f64>, y: &Col<f64>) -> f64 {
    let n = x.nrows().min(y.nrows());
    if n < 2 {
        return 0.0;
    }

    let mx = mean(x);
    let my = mean(y);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return 0.0;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Standardize to zero mean and unit sample variance.
///
/// Returns the transformed vector together with the mean and standard
/// deviation used. A constant vector is centered only (scale 0).
pub fn standardize(x: &Col<f64>) -> (Col<f64>, f64, f64) {
    let n = x.nrows();
    let m = mean(x);
    let sd = if n < 2 { 0.0 } else { std_dev(x) };

    let scaled = if sd > 0.0 && sd.is_finite() {
        Col::from_fn(n, |i| (x[i] - m) / sd)
    } else {
        Col::from_fn(n, |i| x[i] - m)
    };

    (scaled, m, sd)
}

/// Min-max scale into [0, 1]. A constant vector maps to zeros.
pub fn normalize(x: &Col<f64>) -> Col<f64> {
    let n = x.nrows();
    let (min, max) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    if range > 0.0 && range.is_finite() {
        Col::from_fn(n, |i| (x[i] - min) / range)
    } else {
        Col::zeros(n)
    }
}
