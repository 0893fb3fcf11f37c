//! Thin QR and LQ factorizations.

use mdarray::DSlice;
use mdarray_linalg::qr::QR;
use mdarray_linalg_faer::Faer;

use crate::{ncols, nrows, transpose, Matrix};

/// Compute the thin QR factorization `A = Q · R`.
///
/// For an `m×n` input, returns `Q` as `m×k` with orthonormal columns and
/// `R` as `k×n` upper triangular, with `k = min(m, n)`.
pub fn qr_thin(a: &Matrix) -> (Matrix, Matrix) {
    let m = nrows(a);
    let n = ncols(a);
    let k = m.min(n);

    // The backend destroys its input and returns the full factors
    // (Q is m×m, R is m×n); keep the thin ones.
    let mut work = a.clone();
    let a_slice: &mut DSlice<f64, 2> = work.as_mut();
    let (q_full, r_full) = Faer.qr(a_slice);

    let q = Matrix::from_fn([m, k], |idx| q_full[[idx[0], idx[1]]]);
    let r = Matrix::from_fn([k, n], |idx| r_full[[idx[0], idx[1]]]);
    (q, r)
}

/// Compute the thin LQ factorization `A = L · Q` by transposing,
/// factoring, and transposing back.
///
/// For an `m×n` input, returns `L` as `m×k` lower triangular and `Q` as
/// `k×n` with orthonormal rows, with `k = min(m, n)`.
pub fn lq_thin(a: &Matrix) -> (Matrix, Matrix) {
    let at = transpose(a);
    let (qt, rt) = qr_thin(&at);
    (transpose(&rt), transpose(&qt))
}
