//! Core types for tensor train operations.

use mdarray::DTensor;
use ttchain_linalg::Matrix;

use crate::tensor::DenseTensor;

/// A TT core: a 3-D tensor of shape `(left_rank, mode_dim, right_rank)`.
pub type Tensor3 = DTensor<f64, 3>;

/// Accessors and matrix unfoldings for TT cores.
pub trait Tensor3Ops {
    /// The left bond rank.
    fn left_rank(&self) -> usize;

    /// The physical (mode) dimension.
    fn mode_dim(&self) -> usize;

    /// The right bond rank.
    fn right_rank(&self) -> usize;

    /// Unfold to a `(left_rank * mode_dim) × right_rank` matrix.
    fn to_left_matrix(&self) -> Matrix;

    /// Unfold to a `left_rank × (mode_dim * right_rank)` matrix.
    fn to_right_matrix(&self) -> Matrix;

    /// Copy into a dense 3-D tensor.
    fn to_dense(&self) -> DenseTensor;
}

impl Tensor3Ops for Tensor3 {
    fn left_rank(&self) -> usize {
        self.dim(0)
    }

    fn mode_dim(&self) -> usize {
        self.dim(1)
    }

    fn right_rank(&self) -> usize {
        self.dim(2)
    }

    fn to_left_matrix(&self) -> Matrix {
        let mode = self.mode_dim();
        let right = self.right_rank();
        Matrix::from_fn([self.left_rank() * mode, right], |idx| {
            self[[idx[0] / mode, idx[0] % mode, idx[1]]]
        })
    }

    fn to_right_matrix(&self) -> Matrix {
        let mode = self.mode_dim();
        let right = self.right_rank();
        Matrix::from_fn([self.left_rank(), mode * right], |idx| {
            self[[idx[0], idx[1] / right, idx[1] % right]]
        })
    }

    fn to_dense(&self) -> DenseTensor {
        DenseTensor::from_fn(
            vec![self.left_rank(), self.mode_dim(), self.right_rank()],
            |idx| self[[idx[0], idx[1], idx[2]]],
        )
    }
}

/// Create a zero-filled core.
pub fn tensor3_zeros(left: usize, mode: usize, right: usize) -> Tensor3 {
    Tensor3::from_elem([left, mode, right], 0.0)
}

/// Create a core from flat row-major data.
///
/// # Panics
/// Panics if `data.len()` does not equal `left * mode * right`.
pub fn tensor3_from_data(data: Vec<f64>, left: usize, mode: usize, right: usize) -> Tensor3 {
    assert_eq!(data.len(), left * mode * right);
    Tensor3::from_fn([left, mode, right], |idx| {
        data[(idx[0] * mode + idx[1]) * right + idx[2]]
    })
}

/// Refold a `(left * mode) × right` matrix into a core.
///
/// Inverse of [`Tensor3Ops::to_left_matrix`].
pub fn tensor3_from_left_matrix(mat: &Matrix, left: usize, mode: usize, right: usize) -> Tensor3 {
    assert_eq!(mat.dim(0), left * mode);
    assert_eq!(mat.dim(1), right);
    Tensor3::from_fn([left, mode, right], |idx| {
        mat[[idx[0] * mode + idx[1], idx[2]]]
    })
}

/// Refold a `left × (mode * right)` matrix into a core.
///
/// Inverse of [`Tensor3Ops::to_right_matrix`].
pub fn tensor3_from_right_matrix(mat: &Matrix, left: usize, mode: usize, right: usize) -> Tensor3 {
    assert_eq!(mat.dim(0), left);
    assert_eq!(mat.dim(1), mode * right);
    Tensor3::from_fn([left, mode, right], |idx| {
        mat[[idx[0], idx[1] * right + idx[2]]]
    })
}
