//! Matrix utility functions.

use faer::{Col, Mat};

/// Build design matrix, optionally prepending an intercept column.
pub fn build_design_matrix(x: &Mat<f64>, with_intercept: bool) -> Mat<f64> {
    let n = x.nrows();
    let p = x.ncols();

    if with_intercept {
        Mat::from_fn(n, p + 1, |i, j| if j == 0 { 1.0 } else { x[(i, j - 1)] })
    } else {
        x.to_owned()
    }
}

/// Thin QR factors of a tall matrix.
///
/// Q is n × p with orthonormal columns, R is p × p upper triangular.
/// Requires `design.nrows() >= design.ncols()`.
pub fn thin_qr(design: &Mat<f64>) -> (Mat<f64>, Mat<f64>) {
    let n = design.nrows();
    let p = design.ncols();

    let qr = design.qr();
    let q_full = qr.compute_Q();
    let r_full = qr.R();

    let q = Mat::from_fn(n, p, |i, j| q_full[(i, j)]);
    let r = Mat::from_fn(p, p, |i, j| if j >= i { r_full[(i, j)] } else { 0.0 });

    (q, r)
}

/// Center a vector by subtracting the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;

    let centered = Col::from_fn(n, |i| y[i] - mean);

    (centered, mean)
}

/// Euclidean norm of every column of `a`.
pub fn column_norms(a: &Mat<f64>) -> Col<f64> {
    Col::from_fn(a.ncols(), |j| a.col(j).norm_l2())
}

/// Numerical rank of the R factor of an unpivoted QR.
///
/// Column j counts when `|R_jj| > tolerance * ||X_j||`, where `||X_j||` is the
/// norm of the matching design column. The test compares each column with
/// its own scale, so rescaling a column never changes the rank.
pub fn triangular_rank(r: &Mat<f64>, norms: &Col<f64>, tolerance: f64) -> usize {
    let p = r.ncols().min(r.nrows()).min(norms.nrows());
    (0..p)
        .filter(|&j| {
            let pivot = r[(j, j)].abs();
            pivot.is_finite() && pivot > tolerance * norms[j]
        })
        .count()
}

/// Solve `R x = b` for upper-triangular `R` by back-substitution.
///
/// Returns `None` if a zero pivot is encountered.
pub fn back_substitute(r: &Mat<f64>, b: &Col<f64>) -> Option<Col<f64>> {
    let p = r.ncols();
    let mut x = Col::zeros(p);

    for i in (0..p).rev() {
        let pivot = r[(i, i)];
        if pivot == 0.0 || !pivot.is_finite() {
            return None;
        }
        let mut sum = b[i];
        for j in (i + 1)..p {
            sum -= r[(i, j)] * x[j];
        }
        x[i] = sum / pivot;
    }

    Some(x)
}

/// Invert a square upper-triangular matrix column by column.
///
/// Returns `None` on a zero or non-finite pivot. Near-singularity is judged
/// by [`triangular_rank`] before a factor reaches this point.
pub fn invert_upper_triangular(r: &Mat<f64>) -> Option<Mat<f64>> {
    let p = r.ncols();
    let mut inv = Mat::zeros(p, p);
    for col in 0..p {
        let e = Col::from_fn(p, |i| if i == col { 1.0 } else { 0.0 });
        let solution = back_substitute(r, &e)?;
        for row in 0..=col {
            inv[(row, col)] = solution[row];
        }
    }
    Some(inv)
}

/// `A Aᵀ`.
pub fn outer_gram(a: &Mat<f64>) -> Mat<f64> {
    a * a.transpose()
}
