//! The tensor train chain type.

use crate::error::{Result, TensorTrainError};
use crate::types::{Tensor3, Tensor3Ops};

/// A tensor train: an ordered chain of 3-index cores.
///
/// Each core has shape `(r_left, n_k, r_right)`; adjacent cores share
/// their bond rank (`cores[k].r_right == cores[k+1].r_left`) and the
/// boundary ranks are 1. Contracting the whole chain yields a dense
/// tensor with mode dimensions `n_1, ..., n_M`.
#[derive(Debug, Clone)]
pub struct TensorTrain {
    cores: Vec<Tensor3>,
}

impl TensorTrain {
    /// Create a tensor train from a list of cores, validating the
    /// rank-matching invariant.
    ///
    /// # Errors
    /// Returns [`TensorTrainError::Empty`] for an empty core list,
    /// [`TensorTrainError::MalformedChain`] if adjacent bond ranks do not
    /// match, and [`TensorTrainError::InvalidOperation`] if a boundary
    /// rank is not 1.
    pub fn new(cores: Vec<Tensor3>) -> Result<Self> {
        if cores.is_empty() {
            return Err(TensorTrainError::Empty);
        }

        for i in 0..cores.len() - 1 {
            let right = cores[i].right_rank();
            let left = cores[i + 1].left_rank();
            if right != left {
                return Err(TensorTrainError::MalformedChain {
                    site: i,
                    right,
                    left,
                });
            }
        }

        if cores[0].left_rank() != 1 {
            return Err(TensorTrainError::InvalidOperation {
                message: "first core must have left rank 1".to_string(),
            });
        }
        if cores.last().expect("non-empty").right_rank() != 1 {
            return Err(TensorTrainError::InvalidOperation {
                message: "last core must have right rank 1".to_string(),
            });
        }

        Ok(Self { cores })
    }

    /// Create a tensor train without validation (ranks known correct).
    pub(crate) fn from_cores_unchecked(cores: Vec<Tensor3>) -> Self {
        Self { cores }
    }

    /// Number of cores.
    pub fn len(&self) -> usize {
        self.cores.len()
    }

    /// Whether the chain has no cores.
    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    /// The core at position `i`.
    pub fn core(&self, i: usize) -> &Tensor3 {
        &self.cores[i]
    }

    /// All cores in order.
    pub fn cores(&self) -> &[Tensor3] {
        &self.cores
    }

    /// The physical (mode) dimension of every core.
    pub fn mode_dims(&self) -> Vec<usize> {
        self.cores.iter().map(|c| c.mode_dim()).collect()
    }

    /// The internal bond ranks, one per adjacent core pair.
    pub fn bond_ranks(&self) -> Vec<usize> {
        self.cores
            .iter()
            .take(self.cores.len().saturating_sub(1))
            .map(|c| c.right_rank())
            .collect()
    }

    /// Evaluate the represented tensor at a single multi-index by
    /// chaining the per-core mode slices.
    ///
    /// # Errors
    /// Returns [`TensorTrainError::InvalidOperation`] if the index length
    /// or any entry is out of range.
    pub fn evaluate(&self, indices: &[usize]) -> Result<f64> {
        if indices.len() != self.len() {
            return Err(TensorTrainError::InvalidOperation {
                message: format!(
                    "index length {} does not match core count {}",
                    indices.len(),
                    self.len()
                ),
            });
        }

        // Row vector of length r, updated core by core.
        let mut row = vec![1.0];
        for (k, (&i, core)) in indices.iter().zip(&self.cores).enumerate() {
            if i >= core.mode_dim() {
                return Err(TensorTrainError::InvalidOperation {
                    message: format!(
                        "index {} out of bounds for mode {} of dimension {}",
                        i,
                        k,
                        core.mode_dim()
                    ),
                });
            }

            let right = core.right_rank();
            let mut next = vec![0.0; right];
            for (l, &v) in row.iter().enumerate() {
                for (r, slot) in next.iter_mut().enumerate() {
                    *slot += v * core[[l, i, r]];
                }
            }
            row = next;
        }

        Ok(row[0])
    }
}
