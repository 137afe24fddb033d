//! Tracked tensor operations.
//!
//! Every operation computes its output eagerly. When graph recording is
//! enabled and one of the inputs requires grad, it also records a node whose
//! [`Op`](crate::autograd::Op) variant selects the backward rule defined next
//! to the forward implementation.

pub mod activation;
pub mod arithmetic;
pub mod conv;
pub mod linalg;
pub mod loss;
pub mod math_elem;
pub mod reduction;
pub mod view;

use crate::autograd::backward_op::Op;
use crate::autograd::graph;
use crate::tensor::Tensor;

/// Wraps an operation's output buffer and records the node when needed.
///
/// `op` is only evaluated when a node is recorded, so saved buffers are not
/// copied for untracked computations.
pub(crate) fn track(
    data: Vec<f32>,
    shape: Vec<usize>,
    inputs: &[&Tensor],
    op: impl FnOnce() -> Op,
) -> Tensor {
    let output = Tensor::from_raw(data, shape);
    if graph::is_grad_enabled() && inputs.iter().any(|t| t.requires_grad()) {
        let id = graph::record(
            op(),
            inputs.iter().map(|t| (*t).clone()).collect(),
            output.shape(),
        );
        let mut guard = output.write_data();
        guard.requires_grad = true;
        guard.grad_fn = Some(id);
    }
    output
}
