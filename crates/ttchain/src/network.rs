//! Arena-based tensor network.
//!
//! Nodes own their tensors and are addressed by [`NodeId`]; every tensor
//! dimension has a slot that is either free or bound to exactly one slot
//! of another node. Contracting an edge consumes both endpoint nodes and
//! produces a new node, so stale ids fail loudly instead of aliasing.

use ttchain_linalg::{matmul, Matrix};

use crate::error::{Result, TensorTrainError};
use crate::tensor::DenseTensor;

/// Handle to a node in a [`TensorNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Handle to an edge (a pair of bound slots) in a [`TensorNetwork`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeId(usize);

/// State of one tensor dimension of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Free,
    Bound(EdgeId),
}

#[derive(Debug)]
struct Node {
    tensor: DenseTensor,
    slots: Vec<Slot>,
}

/// (node index, slot index)
type Endpoint = (usize, usize);

#[derive(Debug, Clone, Copy)]
enum EdgeState {
    Pending { a: Endpoint, b: Endpoint },
    Contracted,
}

/// A network of owned tensors connected by bound index slots.
#[derive(Debug, Default)]
pub struct TensorNetwork {
    nodes: Vec<Option<Node>>,
    edges: Vec<EdgeState>,
}

impl TensorNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tensor as a new node; all slots start free.
    pub fn add_node(&mut self, tensor: DenseTensor) -> NodeId {
        let slots = vec![Slot::Free; tensor.ndim()];
        self.nodes.push(Some(Node { tensor, slots }));
        NodeId(self.nodes.len() - 1)
    }

    /// Number of live (not yet consumed) nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// The tensor owned by a live node.
    pub fn tensor(&self, id: NodeId) -> Result<&DenseTensor> {
        self.node(id.0).map(|n| &n.tensor)
    }

    fn node(&self, index: usize) -> Result<&Node> {
        self.nodes
            .get(index)
            .and_then(|n| n.as_ref())
            .ok_or_else(|| TensorTrainError::InvalidOperation {
                message: format!("node {} does not exist or was consumed", index),
            })
    }

    /// Bind two free slots of two distinct nodes, asserting their
    /// dimensions agree.
    pub fn bind(&mut self, a: NodeId, slot_a: usize, b: NodeId, slot_b: usize) -> Result<EdgeId> {
        if a == b {
            return Err(TensorTrainError::InvalidOperation {
                message: "cannot bind a node to itself".to_string(),
            });
        }

        let dim_a = self.slot_dim(a.0, slot_a)?;
        let dim_b = self.slot_dim(b.0, slot_b)?;
        if dim_a != dim_b {
            return Err(TensorTrainError::InvalidOperation {
                message: format!(
                    "cannot bind slots of dimension {} and {}",
                    dim_a, dim_b
                ),
            });
        }

        let edge = EdgeId(self.edges.len());
        self.edges.push(EdgeState::Pending {
            a: (a.0, slot_a),
            b: (b.0, slot_b),
        });
        self.set_slot(a.0, slot_a, Slot::Bound(edge));
        self.set_slot(b.0, slot_b, Slot::Bound(edge));
        Ok(edge)
    }

    fn slot_dim(&self, node: usize, slot: usize) -> Result<usize> {
        let n = self.node(node)?;
        if slot >= n.slots.len() {
            return Err(TensorTrainError::InvalidOperation {
                message: format!("slot {} out of range for node {}", slot, node),
            });
        }
        if n.slots[slot] != Slot::Free {
            return Err(TensorTrainError::InvalidOperation {
                message: format!("slot {} of node {} is already bound", slot, node),
            });
        }
        Ok(n.tensor.dims()[slot])
    }

    fn set_slot(&mut self, node: usize, slot: usize, value: Slot) {
        if let Some(n) = self.nodes[node].as_mut() {
            n.slots[slot] = value;
        }
    }

    /// Contract an edge: both endpoint nodes are consumed and replaced by
    /// a single node holding the contraction result. Surviving slots keep
    /// their bindings; pending edges are rewired to the new node.
    ///
    /// The result dimensions are the first node's dimensions without the
    /// contracted slot, followed by the second node's.
    pub fn contract(&mut self, edge: EdgeId) -> Result<NodeId> {
        let (ep_a, ep_b) = match self.edges.get(edge.0) {
            Some(EdgeState::Pending { a, b }) => (*a, *b),
            Some(EdgeState::Contracted) => {
                return Err(TensorTrainError::InvalidOperation {
                    message: format!("edge {} was already contracted", edge.0),
                })
            }
            None => {
                return Err(TensorTrainError::InvalidOperation {
                    message: format!("edge {} does not exist", edge.0),
                })
            }
        };

        if ep_a.0 == ep_b.0 {
            return Err(TensorTrainError::InvalidOperation {
                message: "self-contraction of a single node is not supported".to_string(),
            });
        }
        self.node(ep_a.0)?;
        self.node(ep_b.0)?;
        let node_a = self.nodes[ep_a.0].take().expect("checked above");
        let node_b = self.nodes[ep_b.0].take().expect("checked above");
        self.edges[edge.0] = EdgeState::Contracted;

        let left = unfold_axis_last(&node_a.tensor, ep_a.1);
        let right = unfold_axis_first(&node_b.tensor, ep_b.1);
        let product = matmul(&left, &right);

        let mut dims = Vec::with_capacity(node_a.tensor.ndim() + node_b.tensor.ndim() - 2);
        let mut surviving: Vec<(Endpoint, Slot)> = Vec::with_capacity(dims.capacity());
        for (i, &d) in node_a.tensor.dims().iter().enumerate() {
            if i != ep_a.1 {
                dims.push(d);
                surviving.push(((ep_a.0, i), node_a.slots[i]));
            }
        }
        for (i, &d) in node_b.tensor.dims().iter().enumerate() {
            if i != ep_b.1 {
                dims.push(d);
                surviving.push(((ep_b.0, i), node_b.slots[i]));
            }
        }

        let tensor = matrix_to_dense(&product, dims);
        let slots: Vec<Slot> = surviving.iter().map(|&(_, s)| s).collect();
        let new_index = self.nodes.len();
        self.nodes.push(Some(Node { tensor, slots }));

        // Rewire pending edges from the consumed endpoints to the new node.
        for (pos, &(old, slot)) in surviving.iter().enumerate() {
            if let Slot::Bound(e) = slot {
                if let EdgeState::Pending { a, b } = &mut self.edges[e.0] {
                    if *a == old {
                        *a = (new_index, pos);
                    } else if *b == old {
                        *b = (new_index, pos);
                    }
                }
            }
        }

        Ok(NodeId(new_index))
    }

    /// Consume the network, returning the tensor of the single remaining
    /// live node.
    pub fn into_single_tensor(self) -> Result<DenseTensor> {
        let mut live: Vec<Node> = self.nodes.into_iter().flatten().collect();
        match live.len() {
            0 => Err(TensorTrainError::Empty),
            1 => Ok(live.pop().expect("length checked").tensor),
            n => Err(TensorTrainError::InvalidOperation {
                message: format!("network still has {} unconnected nodes", n),
            }),
        }
    }
}

/// Unfold a tensor to a matrix with `axis` as the column dimension and the
/// remaining axes, in order, flattened row-major into the row dimension.
fn unfold_axis_last(t: &DenseTensor, axis: usize) -> Matrix {
    let dims = t.dims();
    let d = dims[axis];
    let rows = t.size() / d;
    let strides = row_major_strides(dims);

    Matrix::from_fn([rows, d], |idx| {
        t.data()[offset_without_axis(dims, &strides, axis, idx[0]) + idx[1] * strides[axis]]
    })
}

/// Unfold a tensor to a matrix with `axis` as the row dimension and the
/// remaining axes, in order, flattened row-major into the column dimension.
fn unfold_axis_first(t: &DenseTensor, axis: usize) -> Matrix {
    let dims = t.dims();
    let d = dims[axis];
    let cols = t.size() / d;
    let strides = row_major_strides(dims);

    Matrix::from_fn([d, cols], |idx| {
        t.data()[offset_without_axis(dims, &strides, axis, idx[1]) + idx[0] * strides[axis]]
    })
}

fn row_major_strides(dims: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; dims.len()];
    for i in (0..dims.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

/// Flat offset of the `flat`-th row-major multi-index over all axes except
/// `axis`.
fn offset_without_axis(dims: &[usize], strides: &[usize], axis: usize, flat: usize) -> usize {
    let mut rem = flat;
    let mut offset = 0;
    for i in (0..dims.len()).rev() {
        if i == axis {
            continue;
        }
        offset += (rem % dims[i]) * strides[i];
        rem /= dims[i];
    }
    offset
}

fn matrix_to_dense(m: &Matrix, dims: Vec<usize>) -> DenseTensor {
    let cols = m.dim(1);
    let mut data = Vec::with_capacity(m.dim(0) * cols);
    for i in 0..m.dim(0) {
        for j in 0..cols {
            data.push(m[[i, j]]);
        }
    }
    DenseTensor::from_vec(dims, data)
}
