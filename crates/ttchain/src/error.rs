//! Error types for tensor train operations.

use thiserror::Error;
use ttchain_linalg::SvdError;

/// Result type for tensor train operations.
pub type Result<T> = std::result::Result<T, TensorTrainError>;

/// Errors that can occur during tensor train operations.
///
/// All variants are contract violations detected eagerly at the boundary
/// of the offending operation; none are retried or downgraded to
/// approximate results.
#[derive(Error, Debug)]
pub enum TensorTrainError {
    /// Requested SVD truncation rank outside `[1, min(m, n)]`.
    #[error("invalid truncation rank {rank}: must be in [1, {max}]")]
    InvalidRank {
        /// The requested rank.
        rank: usize,
        /// The largest admissible rank.
        max: usize,
    },

    /// A zero numerical rank was encountered during TT-SVD construction.
    #[error("degenerate tensor: zero numerical rank at mode {mode}")]
    DegenerateTensor {
        /// The mode index at which the degenerate slice was observed.
        mode: usize,
    },

    /// Malformed rounding request (wrong profile length or zero target rank).
    #[error("invalid rank profile: {message}")]
    InvalidRankProfile {
        /// Description of the violation.
        message: String,
    },

    /// Adjacent cores with mismatched bond ranks.
    #[error(
        "malformed chain: right rank {right} of core {site} does not match \
         left rank {left} of the next core"
    )]
    MalformedChain {
        /// Index of the left core of the mismatched bond.
        site: usize,
        /// Right bond rank of the left core.
        right: usize,
        /// Left bond rank of the right core.
        left: usize,
    },

    /// Empty tensor or tensor train.
    #[error("tensor train is empty")]
    Empty,

    /// Invalid operation.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of the invalid operation.
        message: String,
    },

    /// The linear algebra backend failed.
    #[error("linear algebra backend error: {0}")]
    Linalg(String),
}

impl From<SvdError> for TensorTrainError {
    fn from(err: SvdError) -> Self {
        match err {
            SvdError::InvalidRank { rank, max } => Self::InvalidRank { rank, max },
            other => Self::Linalg(other.to_string()),
        }
    }
}
