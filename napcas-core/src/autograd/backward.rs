use crate::autograd::backward_op::BackwardContext;
use crate::autograd::graph::{self, Node, NodeId};
use crate::error::NapcasError;
use crate::tensor::Tensor;
use log::debug;
use std::collections::HashMap;

fn released_error(id: NodeId) -> NapcasError {
    NapcasError::InvalidBackwardCall(format!(
        "graph node {:?} was already released by a previous backward pass \
         (use backward_retain_graph to traverse a graph more than once)",
        id
    ))
}

/// Runs the reverse traversal of the graph rooted at `root`.
///
/// Nodes are discovered depth-first, each one counting how many consumers
/// will send it a gradient. A node runs only once all of those contributions
/// have been summed, which keeps diamonds and residual connections correct.
/// Leaf tensors that require grad accumulate their gradient as soon as it is
/// produced.
pub(crate) fn run_backward(root: &Tensor, retain_graph: bool) -> Result<(), NapcasError> {
    let (numel, shape, requires_grad, root_fn) = {
        let guard = root.read_data();
        (
            guard.numel(),
            guard.shape.clone(),
            guard.requires_grad,
            guard.grad_fn,
        )
    };
    if numel != 1 {
        return Err(NapcasError::InvalidBackwardCall(format!(
            "backward() can only be called on a scalar tensor, got shape {:?}",
            shape
        )));
    }
    if !requires_grad {
        return Err(NapcasError::InvalidBackwardCall(
            "tensor does not require grad and has no grad_fn".to_string(),
        ));
    }

    // The root's own gradient is dL/dL = 1. It is only written once the
    // graph is known to be traversable, so a failed call changes nothing.
    let root_id = match root_fn {
        Some(id) => id,
        None => return root.accumulate_grad(vec![1.0]),
    };

    // --- Discovery ---
    let mut nodes: HashMap<NodeId, Node> = HashMap::new();
    let mut pending: HashMap<NodeId, usize> = HashMap::new();
    let root_node = graph::get(root_id).ok_or_else(|| released_error(root_id))?;
    nodes.insert(root_id, root_node);
    let mut stack = vec![root_id];
    while let Some(id) = stack.pop() {
        let parents: Vec<NodeId> = nodes[&id]
            .inputs
            .iter()
            .filter(|input| input.requires_grad())
            .filter_map(|input| input.grad_fn())
            .collect();
        for parent in parents {
            *pending.entry(parent).or_insert(0) += 1;
            if !nodes.contains_key(&parent) {
                let node = graph::get(parent).ok_or_else(|| released_error(parent))?;
                nodes.insert(parent, node);
                stack.push(parent);
            }
        }
    }
    if pending.contains_key(&root_id) {
        return Err(NapcasError::GraphCycle);
    }
    let discovered = nodes.len();
    root.accumulate_grad(vec![1.0])?;

    // --- Traversal ---
    let mut grads: HashMap<NodeId, Vec<f32>> = HashMap::new();
    grads.insert(root_id, vec![1.0]);
    let mut ready = vec![root_id];
    while let Some(id) = ready.pop() {
        let node = nodes
            .remove(&id)
            .ok_or_else(|| NapcasError::InternalError(format!("node {:?} scheduled twice", id)))?;
        let grad_output = grads.remove(&id).ok_or_else(|| {
            NapcasError::InternalError(format!("node {:?} has no incoming gradient", id))
        })?;
        let needs_grad: Vec<bool> = node.inputs.iter().map(|t| t.requires_grad()).collect();
        let ctx = BackwardContext {
            grad_output: &grad_output,
            output_shape: &node.output_shape,
            inputs: &node.inputs,
            saved: &node.saved,
            needs_grad: &needs_grad,
        };
        let input_grads = node.op.backward(&ctx)?;
        if input_grads.len() != node.inputs.len() {
            return Err(NapcasError::UnsupportedGradient {
                op: node.op.name().to_string(),
                reason: format!(
                    "backward produced {} gradients for {} inputs",
                    input_grads.len(),
                    node.inputs.len()
                ),
            });
        }

        for ((input, needed), grad) in node.inputs.iter().zip(needs_grad).zip(input_grads) {
            if !needed {
                continue;
            }
            let grad = grad.ok_or_else(|| NapcasError::UnsupportedGradient {
                op: node.op.name().to_string(),
                reason: "no gradient produced for an input that requires grad".to_string(),
            })?;
            if grad.len() != input.numel() {
                return Err(NapcasError::UnsupportedGradient {
                    op: node.op.name().to_string(),
                    reason: format!(
                        "gradient has {} elements, input has shape {:?}",
                        grad.len(),
                        input.shape()
                    ),
                });
            }
            match input.grad_fn() {
                Some(parent) => {
                    match grads.get_mut(&parent) {
                        Some(acc) => acc.iter_mut().zip(grad).for_each(|(a, g)| *a += g),
                        None => {
                            grads.insert(parent, grad);
                        }
                    }
                    let remaining = pending.get_mut(&parent).ok_or_else(|| {
                        NapcasError::InternalError(format!("node {:?} was not discovered", parent))
                    })?;
                    *remaining -= 1;
                    if *remaining == 0 {
                        ready.push(parent);
                    }
                }
                None => input.accumulate_grad(grad)?,
            }
        }

        if !retain_graph {
            drop(graph::take(id));
        }
    }

    if !nodes.is_empty() {
        // Some node never received all of its consumers' gradients.
        return Err(NapcasError::GraphCycle);
    }
    debug!(
        "backward from {:?} processed {} nodes (retain_graph={})",
        root_id, discovered, retain_graph
    );
    Ok(())
}
