//! Reverse-mode automatic differentiation.
//!
//! Operations record [`backward_op::Op`] nodes into a per-thread arena
//! ([`graph`]); [`Tensor::backward`](crate::Tensor::backward) replays them in
//! reverse topological order.

pub(crate) mod backward;
pub mod backward_op;
pub mod grad_check;
pub mod graph;

pub use backward_op::Op;
pub use graph::{is_grad_enabled, live_node_count, no_grad, NoGradGuard, NodeId};

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
