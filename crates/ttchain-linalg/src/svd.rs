//! Singular value decomposition and numerical rank.

use mdarray::DSlice;
use mdarray_linalg::svd::{SVDDecomp, SVDError as BackendSvdError, SVD};
use mdarray_linalg_faer::Faer;
use thiserror::Error;

use crate::{ncols, nrows, Matrix};

/// Error type for SVD-based operations.
#[derive(Debug, Error)]
pub enum SvdError {
    /// Requested truncation rank outside `[1, min(m, n)]`.
    #[error("invalid truncation rank {rank}: must be in [1, {max}]")]
    InvalidRank {
        /// The requested rank.
        rank: usize,
        /// The largest admissible rank, `min(m, n)`.
        max: usize,
    },

    /// Invalid relative tolerance for numerical rank detection.
    #[error("invalid rtol value: {0}. rtol must be finite and non-negative")]
    InvalidRtol(f64),

    /// The backend SVD computation failed.
    #[error("SVD computation failed: {0}")]
    Backend(#[from] BackendSvdError),
}

/// Truncated singular value decomposition `A ≈ U · diag(σ) · Vᵀ`.
///
/// `u` is `m×r` with orthonormal columns, `singular_values` holds the `r`
/// largest singular values in descending order, and `vt` is `r×n` with
/// orthonormal rows.
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// Left singular vectors, `m×r`.
    pub u: Matrix,
    /// The `r` largest singular values, descending.
    pub singular_values: Vec<f64>,
    /// Right singular vectors transposed, `r×n`.
    pub vt: Matrix,
}

impl TruncatedSvd {
    /// The retained rank `r`.
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    /// The product `diag(σ) · Vᵀ` as an `r×n` matrix.
    pub fn s_vt(&self) -> Matrix {
        let r = self.rank();
        let n = ncols(&self.vt);
        Matrix::from_fn([r, n], |idx| self.singular_values[idx[0]] * self.vt[[idx[0], idx[1]]])
    }
}

/// Compute the full thin SVD factors `(σ, U, Vᵀ)` of a matrix.
///
/// Returns singular values of length `k = min(m, n)`, `U` as `m×k` and
/// `Vᵀ` as `k×n`.
fn svd_factors(a: &Matrix) -> Result<(Vec<f64>, Matrix, Matrix), SvdError> {
    let m = nrows(a);
    let n = ncols(a);
    let k = m.min(n);

    // The backend destroys its input, so factor a working copy.
    let mut work = a.clone();
    let a_slice: &mut DSlice<f64, 2> = work.as_mut();
    let SVDDecomp { s, u, vt } = Faer.svd(a_slice)?;

    // NOTE: `mdarray-linalg-faer` writes singular values into a diagonal
    // view whose buffer is the first row (LAPACK-style convention), so the
    // values live at `s[[0, i]]`, not necessarily at `s[[i, i]]`.
    let mut s_vec = Vec::with_capacity(k);
    for i in 0..k {
        s_vec.push(s[[0, i]]);
    }

    // The backend returns U as m×m and Vᵀ as n×n; keep the thin factors.
    let u_thin = Matrix::from_fn([m, k], |idx| u[[idx[0], idx[1]]]);
    let vt_thin = Matrix::from_fn([k, n], |idx| vt[[idx[0], idx[1]]]);

    Ok((s_vec, u_thin, vt_thin))
}

/// Compute the best rank-`rank` factorization of `a` in Frobenius norm.
///
/// By the Eckart–Young theorem the returned `U · diag(σ) · Vᵀ` is the
/// closest rank-`rank` matrix to `a`.
///
/// # Errors
/// Returns [`SvdError::InvalidRank`] if `rank` is zero or exceeds
/// `min(m, n)`, and [`SvdError::Backend`] if the factorization fails.
pub fn svd_truncated(a: &Matrix, rank: usize) -> Result<TruncatedSvd, SvdError> {
    let m = nrows(a);
    let n = ncols(a);
    let max = m.min(n);
    if rank == 0 || rank > max {
        return Err(SvdError::InvalidRank { rank, max });
    }

    let (s_vec, u, vt) = svd_factors(a)?;

    let u_r = Matrix::from_fn([m, rank], |idx| u[[idx[0], idx[1]]]);
    let vt_r = Matrix::from_fn([rank, n], |idx| vt[[idx[0], idx[1]]]);

    Ok(TruncatedSvd {
        u: u_r,
        singular_values: s_vec[..rank].to_vec(),
        vt: vt_r,
    })
}

/// Compute all singular values of `a` in descending order.
///
/// # Errors
/// Returns [`SvdError::Backend`] if the factorization fails.
pub fn singular_values(a: &Matrix) -> Result<Vec<f64>, SvdError> {
    let (s_vec, _, _) = svd_factors(a)?;
    Ok(s_vec)
}

/// Default relative tolerance for numerical rank detection.
///
/// Matches the numpy `matrix_rank` rule: `max(m, n) * eps`, applied
/// relative to the largest singular value.
pub fn default_rank_rtol(m: usize, n: usize) -> f64 {
    m.max(n) as f64 * f64::EPSILON
}

/// Compute the numerical rank of `a`: the number of singular values
/// exceeding `rtol * σ_max`.
///
/// If `rtol` is `None`, uses [`default_rank_rtol`]. A zero matrix has
/// numerical rank 0.
///
/// # Errors
/// Returns [`SvdError::InvalidRtol`] for a non-finite or negative `rtol`
/// and [`SvdError::Backend`] if the factorization fails.
pub fn matrix_rank(a: &Matrix, rtol: Option<f64>) -> Result<usize, SvdError> {
    let rtol = rtol.unwrap_or_else(|| default_rank_rtol(nrows(a), ncols(a)));
    if !rtol.is_finite() || rtol < 0.0 {
        return Err(SvdError::InvalidRtol(rtol));
    }

    let s_vec = singular_values(a)?;
    let sigma_max = s_vec.first().copied().unwrap_or(0.0);
    if sigma_max == 0.0 {
        return Ok(0);
    }

    let threshold = rtol * sigma_max;
    Ok(s_vec.iter().take_while(|&&s| s > threshold).count())
}
