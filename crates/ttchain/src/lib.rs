#![warn(missing_docs)]
//! Tensor-train (TT) decomposition and rounding for dense tensors.
//!
//! This crate factors a dense N-way tensor into a chain of 3-index cores
//! whose sequential contraction reconstructs the original tensor, and
//! reduces the bond ranks of an existing chain to a target profile while
//! controlling the reconstruction error:
//! - [`tt_decompose`]: TT-SVD construction, exact up to numerical rank
//! - [`tt_round`]: two-pass (orthogonalize, then truncate) rank reduction
//! - [`attach`] / [`reconstruct`]: contract a chain back to a dense tensor
//! - [`frobenius_norm`]: error reporting for callers
//!
//! # Example
//!
//! ```
//! use ttchain::{frobenius_norm, tt_decompose, DenseTensor};
//!
//! let t = DenseTensor::from_fn(vec![2, 2, 2], |idx| (idx[0] + 2 * idx[1] + 4 * idx[2]) as f64);
//! let chain = tt_decompose(&t).unwrap();
//! let recon = chain.to_dense().unwrap();
//! assert!(frobenius_norm(&(&recon - &t)) < 1e-10);
//! ```

pub mod contraction;
pub mod decomposition;
pub mod error;
pub mod network;
pub mod rounding;
pub mod tensor;
pub mod tensortrain;
pub mod types;

pub use contraction::{attach, frobenius_norm, reconstruct};
pub use decomposition::{tt_decompose, tt_decompose_with, DecomposeOptions};
pub use error::{Result, TensorTrainError};
pub use network::{EdgeId, NodeId, TensorNetwork};
pub use rounding::tt_round;
pub use tensor::DenseTensor;
pub use tensortrain::TensorTrain;
pub use types::{tensor3_from_data, tensor3_zeros, Tensor3, Tensor3Ops};
