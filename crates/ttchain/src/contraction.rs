//! Connecting and contracting a tensor train back into a dense tensor.

use crate::error::{Result, TensorTrainError};
use crate::network::{EdgeId, TensorNetwork};
use crate::tensor::DenseTensor;
use crate::tensortrain::TensorTrain;
use crate::types::Tensor3Ops;

/// Copy a chain's cores into a fresh network and bind each adjacent pair
/// over their shared bond, returning the network and the edge list in
/// chain order.
///
/// The input chain is not consumed or modified; the network owns
/// independent copies of the cores.
///
/// # Errors
/// Returns [`TensorTrainError::Empty`] for an empty chain and
/// [`TensorTrainError::MalformedChain`] if adjacent bond ranks disagree.
pub fn attach(chain: &TensorTrain) -> Result<(TensorNetwork, Vec<EdgeId>)> {
    if chain.is_empty() {
        return Err(TensorTrainError::Empty);
    }

    let mut network = TensorNetwork::new();
    let ids: Vec<_> = chain
        .cores()
        .iter()
        .map(|core| network.add_node(core.to_dense()))
        .collect();

    let mut edges = Vec::with_capacity(chain.len() - 1);
    for i in 0..chain.len() - 1 {
        let right = chain.core(i).right_rank();
        let left = chain.core(i + 1).left_rank();
        if right != left {
            return Err(TensorTrainError::MalformedChain {
                site: i,
                right,
                left,
            });
        }
        // Right bond slot of core i to left bond slot of core i+1.
        edges.push(network.bind(ids[i], 2, ids[i + 1], 0)?);
    }

    Ok((network, edges))
}

/// Contract the attached edges in sequence and return the reconstructed
/// dense tensor of shape `(d_1, ..., d_N)`.
///
/// The full contraction yields shape `(1, d_1, ..., d_N, 1)`; the two
/// boundary bond dimensions are dropped.
///
/// # Errors
/// Returns [`TensorTrainError::InvalidOperation`] if the edges do not
/// reduce the network to a single node or the surviving node does not
/// have unit boundary dimensions.
pub fn reconstruct(mut network: TensorNetwork, edges: &[EdgeId]) -> Result<DenseTensor> {
    for &edge in edges {
        network.contract(edge)?;
    }

    let full = network.into_single_tensor()?;
    let dims = full.dims();
    if dims.len() < 2 || dims[0] != 1 || dims[dims.len() - 1] != 1 {
        return Err(TensorTrainError::InvalidOperation {
            message: format!("contracted tensor has non-unit boundary ranks: {:?}", dims),
        });
    }

    Ok(full.reshape(dims[1..dims.len() - 1].to_vec()))
}

/// The Frobenius norm: the square root of the sum of squared entries.
pub fn frobenius_norm(tensor: &DenseTensor) -> f64 {
    tensor.data().iter().map(|x| x * x).sum::<f64>().sqrt()
}

impl TensorTrain {
    /// Contract the whole chain into the dense tensor it represents.
    ///
    /// Warning: the result has as many entries as the product of all mode
    /// dimensions.
    pub fn to_dense(&self) -> Result<DenseTensor> {
        let (network, edges) = attach(self)?;
        reconstruct(network, &edges)
    }
}
