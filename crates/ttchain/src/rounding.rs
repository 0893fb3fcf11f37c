//! TT-rounding: rank reduction of an existing tensor train.

use ttchain_linalg::{lq_thin, matmul, ncols, svd_truncated};

use crate::error::{Result, TensorTrainError};
use crate::tensortrain::TensorTrain;
use crate::types::{tensor3_from_left_matrix, tensor3_from_right_matrix, Tensor3, Tensor3Ops};

/// Round a tensor train to a target bond-rank profile.
///
/// Returns a new chain with the same mode dimensions whose bond rank at
/// position k equals `min(profile[k], natural_bound_k)`; the input chain
/// is not modified. Two passes:
///
/// 1. **Backward orthogonalization** (right to left): every core is
///    replaced by the row-orthonormal factor of its right-unfolding and
///    the triangular factor is pushed into its left neighbor, so all the
///    weight accumulates in the first core.
/// 2. **Forward truncation** (left to right): every core's left-unfolding
///    is truncated-SVD'd at the target rank; `U` stays, `diag(σ)·Vᵀ` is
///    pushed into the right neighbor.
///
/// Orthogonalizing fully before any truncation is what bounds the total
/// rounding error by the norms of the discarded singular values.
///
/// # Errors
/// Returns [`TensorTrainError::InvalidRankProfile`] if the profile length
/// is not `len() - 1` or any target rank is zero.
pub fn tt_round(chain: &TensorTrain, profile: &[usize]) -> Result<TensorTrain> {
    let m = chain.len();
    if m == 0 {
        return Err(TensorTrainError::Empty);
    }
    if profile.len() != m - 1 {
        return Err(TensorTrainError::InvalidRankProfile {
            message: format!(
                "expected {} target ranks for a chain of {} cores, got {}",
                m - 1,
                m,
                profile.len()
            ),
        });
    }
    if let Some(pos) = profile.iter().position(|&r| r == 0) {
        return Err(TensorTrainError::InvalidRankProfile {
            message: format!("target rank at bond {} must be at least 1", pos),
        });
    }

    let mut cores: Vec<Tensor3> = chain.cores().to_vec();
    if m == 1 {
        return Ok(TensorTrain::from_cores_unchecked(cores));
    }

    // Backward pass: make cores 2..M right-orthogonal, pushing the
    // triangular factors into core 1.
    for k in (1..m).rev() {
        let mode = cores[k].mode_dim();
        let right = cores[k].right_rank();

        let mat = cores[k].to_right_matrix();
        let (l_factor, q) = lq_thin(&mat);
        let bond = ncols(&l_factor);
        cores[k] = tensor3_from_right_matrix(&q, bond, mode, right);

        let prev_left = cores[k - 1].left_rank();
        let prev_mode = cores[k - 1].mode_dim();
        let absorbed = matmul(&cores[k - 1].to_left_matrix(), &l_factor);
        cores[k - 1] = tensor3_from_left_matrix(&absorbed, prev_left, prev_mode, bond);
    }

    // Forward pass: truncate each bond, pushing diag(σ)·Vᵀ rightward.
    for (k, &requested) in profile.iter().enumerate() {
        let left = cores[k].left_rank();
        let mode = cores[k].mode_dim();
        let right = cores[k].right_rank();

        // A requested rank beyond the bond's natural bound is capped.
        let target = requested.min((left * mode).min(right));
        let factors = svd_truncated(&cores[k].to_left_matrix(), target)?;
        cores[k] = tensor3_from_left_matrix(&factors.u, left, mode, target);

        let next_mode = cores[k + 1].mode_dim();
        let next_right = cores[k + 1].right_rank();
        let absorbed = matmul(&factors.s_vt(), &cores[k + 1].to_right_matrix());
        cores[k + 1] = tensor3_from_right_matrix(&absorbed, target, next_mode, next_right);
    }

    Ok(TensorTrain::from_cores_unchecked(cores))
}
