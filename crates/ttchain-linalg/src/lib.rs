#![warn(missing_docs)]
//! Dense matrix primitives for the ttchain tensor-train crates.
//!
//! This crate wraps the `mdarray-linalg` trait layer (Faer backend) behind
//! the small set of factorizations the tensor-train algorithms need:
//! - [`svd_truncated`]: best rank-r factorization in Frobenius norm
//! - [`singular_values`] / [`matrix_rank`]: numerical rank detection
//! - [`qr_thin`] / [`lq_thin`]: thin orthogonal factorizations
//! - [`matmul`]: dense matrix product
//!
//! All routines operate on row-major [`Matrix`] values (`DTensor<f64, 2>`).

pub mod matmul;
pub mod qr;
pub mod svd;

use mdarray::DTensor;

/// A dense, row-major `f64` matrix.
pub type Matrix = DTensor<f64, 2>;

pub use matmul::matmul;
pub use qr::{lq_thin, qr_thin};
pub use svd::{
    default_rank_rtol, matrix_rank, singular_values, svd_truncated, SvdError, TruncatedSvd,
};

/// Number of rows of a matrix.
pub fn nrows(a: &Matrix) -> usize {
    a.dim(0)
}

/// Number of columns of a matrix.
pub fn ncols(a: &Matrix) -> usize {
    a.dim(1)
}

/// Transpose of a matrix.
pub fn transpose(a: &Matrix) -> Matrix {
    let (m, n) = (nrows(a), ncols(a));
    Matrix::from_fn([n, m], |idx| a[[idx[1], idx[0]]])
}

/// Zero-filled matrix of the given shape.
pub fn zeros(rows: usize, cols: usize) -> Matrix {
    Matrix::from_elem([rows, cols], 0.0)
}

/// Reinterpret a row-major matrix with a new shape of the same size.
///
/// # Panics
/// Panics if `rows * cols` does not match the element count of `a`.
pub fn reshape(a: &Matrix, rows: usize, cols: usize) -> Matrix {
    let old_cols = ncols(a);
    assert_eq!(
        rows * cols,
        nrows(a) * old_cols,
        "reshape size mismatch: {}x{} to {}x{}",
        nrows(a),
        old_cols,
        rows,
        cols
    );
    Matrix::from_fn([rows, cols], |idx| {
        let flat = idx[0] * cols + idx[1];
        a[[flat / old_cols, flat % old_cols]]
    })
}
