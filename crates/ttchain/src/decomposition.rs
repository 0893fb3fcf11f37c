//! TT-SVD construction of a tensor train from a dense tensor.

use ttchain_linalg::{matrix_rank, reshape, svd_truncated};

use crate::error::{Result, TensorTrainError};
use crate::tensor::DenseTensor;
use crate::tensortrain::TensorTrain;
use crate::types::{tensor3_from_data, tensor3_from_left_matrix, tensor3_from_right_matrix};

/// Options for TT-SVD construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecomposeOptions {
    /// Relative tolerance for the per-step numerical rank, applied
    /// relative to the largest singular value of the unfolded remainder.
    /// If `None`, uses `max(m, n) * f64::EPSILON` for an `m×n` unfolding
    /// (the numpy `matrix_rank` default).
    pub rank_rtol: Option<f64>,
}

impl DecomposeOptions {
    /// Create options with the given numerical-rank tolerance.
    pub fn with_rank_rtol(rtol: f64) -> Self {
        Self {
            rank_rtol: Some(rtol),
        }
    }
}

/// Decompose a dense tensor into a tensor train, exact up to numerical
/// rank, using the default rank tolerance.
///
/// See [`tt_decompose_with`] for tolerance control.
pub fn tt_decompose(tensor: &DenseTensor) -> Result<TensorTrain> {
    tt_decompose_with(tensor, &DecomposeOptions::default())
}

/// Decompose a dense tensor into a tensor train, exact up to numerical
/// rank.
///
/// Sweeps over the modes left to right, keeping a remainder matrix: at
/// step k the current mode is folded into the row dimension, the
/// numerical rank of that unfolding is detected, and a truncated SVD at
/// exactly that rank splits off core k (the `U` factor) while
/// `diag(σ)·Vᵀ` becomes the next remainder. Contracting the resulting
/// chain reproduces the input to within floating-point error.
///
/// # Errors
/// Returns [`TensorTrainError::Empty`] for a zero-dimensional tensor and
/// [`TensorTrainError::DegenerateTensor`] if an unfolding has numerical
/// rank zero (an all-zero slice).
pub fn tt_decompose_with(tensor: &DenseTensor, options: &DecomposeOptions) -> Result<TensorTrain> {
    let dims = tensor.dims().to_vec();
    if dims.is_empty() {
        return Err(TensorTrainError::Empty);
    }
    if dims.contains(&0) {
        return Err(TensorTrainError::InvalidOperation {
            message: format!("tensor has a zero-sized dimension: {:?}", dims),
        });
    }

    let n = dims.len();
    if n == 1 {
        // A vector is its own single core; no factorization needed.
        let core = tensor3_from_data(tensor.data().to_vec(), 1, dims[0], 1);
        return Ok(TensorTrain::from_cores_unchecked(vec![core]));
    }

    let mut cores = Vec::with_capacity(n);
    let mut r_prev = 1usize;
    let mut remainder = tensor.to_matrix(1, tensor.size());

    for (k, &dim) in dims.iter().enumerate().take(n - 1) {
        // Fold the current mode into the row dimension.
        let rows = r_prev * dim;
        let cols = remainder.dim(0) * remainder.dim(1) / rows;
        let unfolded = reshape(&remainder, rows, cols);

        let rank = matrix_rank(&unfolded, options.rank_rtol)?;
        if rank == 0 {
            return Err(TensorTrainError::DegenerateTensor { mode: k });
        }

        // Lossless split: `rank` is the numerical rank of the unfolding.
        let factors = svd_truncated(&unfolded, rank)?;
        cores.push(tensor3_from_left_matrix(&factors.u, r_prev, dim, rank));

        remainder = factors.s_vt();
        r_prev = rank;
    }

    // The remainder is the last core, with a unit right bond.
    let last_dim = dims[n - 1];
    cores.push(tensor3_from_right_matrix(&remainder, r_prev, last_dim, 1));

    Ok(TensorTrain::from_cores_unchecked(cores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contraction::frobenius_norm;
    use crate::types::Tensor3Ops;

    #[test]
    fn test_decompose_vector_is_identity() {
        let t = DenseTensor::from_vec(vec![4], vec![1.0, -2.0, 3.0, 0.5]);
        let tt = tt_decompose(&t).expect("decompose should succeed");

        assert_eq!(tt.len(), 1);
        let core = tt.core(0);
        assert_eq!(
            (core.left_rank(), core.mode_dim(), core.right_rank()),
            (1, 4, 1)
        );
        for (i, &v) in t.data().iter().enumerate() {
            assert_eq!(core[[0, i, 0]], v);
        }

        let recon = tt.to_dense().expect("reconstruct should succeed");
        assert!(frobenius_norm(&(&recon - &t)) < 1e-14);
    }

    #[test]
    fn test_decompose_separable_tensor_is_rank_one() {
        // T[i, j, k] = a_i * b_j * c_k has all TT ranks 1.
        let a = [1.0, 2.0];
        let b = [1.0, -1.0, 0.5];
        let c = [2.0, 3.0];
        let t = DenseTensor::from_fn(vec![2, 3, 2], |idx| a[idx[0]] * b[idx[1]] * c[idx[2]]);

        let tt = tt_decompose(&t).expect("decompose should succeed");
        assert_eq!(tt.bond_ranks(), vec![1, 1]);

        let recon = tt.to_dense().expect("reconstruct should succeed");
        assert!(frobenius_norm(&(&recon - &t)) < 1e-12);
    }

    #[test]
    fn test_decompose_zero_tensor_is_degenerate() {
        let t = DenseTensor::zeros(vec![2, 2, 2]);
        assert!(matches!(
            tt_decompose(&t),
            Err(TensorTrainError::DegenerateTensor { mode: 0 })
        ));
    }

    #[test]
    fn test_decompose_empty_shape() {
        let t = DenseTensor::from_vec(Vec::new(), vec![1.0]);
        assert!(matches!(tt_decompose(&t), Err(TensorTrainError::Empty)));
    }

    #[test]
    fn test_decompose_rank_rtol_is_configurable() {
        // A nearly rank-1 matrix: a coarse tolerance collapses the bond.
        let t = DenseTensor::from_fn(vec![2, 2], |idx| {
            let base = [[2.0, 4.0], [1.0, 2.0]][idx[0]][idx[1]];
            base + if idx[0] == 1 && idx[1] == 1 { 1e-9 } else { 0.0 }
        });

        let exact = tt_decompose(&t).expect("decompose should succeed");
        assert_eq!(exact.bond_ranks(), vec![2]);

        let coarse = tt_decompose_with(&t, &DecomposeOptions::with_rank_rtol(1e-6))
            .expect("decompose should succeed");
        assert_eq!(coarse.bond_ranks(), vec![1]);
    }
}
