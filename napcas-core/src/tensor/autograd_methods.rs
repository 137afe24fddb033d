use crate::autograd::backward::run_backward;
use crate::autograd::graph::{self, NodeId};
use crate::error::NapcasError;
use crate::tensor::Tensor;
use log::warn;

impl Tensor {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` flag of a leaf tensor.
    ///
    /// # Errors
    /// Returns `NapcasError::InvalidBackwardCall` when called on a non-leaf
    /// tensor: its flag is owned by the graph.
    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<(), NapcasError> {
        let mut guard = self.write_data();
        if guard.grad_fn.is_some() {
            return Err(NapcasError::InvalidBackwardCall(
                "requires_grad can only be changed on leaf tensors; use detach() first".to_string(),
            ));
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// Builder form of [`Tensor::set_requires_grad`] for freshly created leaves.
    pub fn with_requires_grad(self) -> Self {
        if let Err(e) = self.set_requires_grad(true) {
            warn!("with_requires_grad ignored: {}", e);
        }
        self
    }

    /// Returns a handle to the accumulated gradient, if any.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Returns the handle of the node that produced this tensor.
    pub fn grad_fn(&self) -> Option<NodeId> {
        self.read_data().grad_fn
    }

    /// Name of the operation that produced this tensor, if its node is still alive.
    pub fn grad_fn_name(&self) -> Option<&'static str> {
        self.grad_fn()
            .and_then(graph::get)
            .map(|node| node.op.name())
    }

    /// A leaf is a tensor not produced by a recorded operation.
    pub fn is_leaf(&self) -> bool {
        self.read_data().grad_fn.is_none()
    }

    /// Resets the gradient to zeros, keeping its shape. Does nothing if no
    /// gradient was accumulated yet. `data` and `grad_fn` are untouched.
    pub fn zero_grad(&self) {
        let mut guard = self.write_data();
        if let Some(grad) = guard.grad.as_ref() {
            let shape = grad.shape();
            let numel = grad.numel();
            // A fresh buffer: handles previously returned by grad() keep their values.
            guard.grad = Some(Tensor::from_raw(vec![0.0; numel], shape));
        }
    }

    /// Drops the gradient entirely.
    pub fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// Adds `delta` (laid out in this tensor's shape) into the gradient.
    pub(crate) fn accumulate_grad(&self, delta: Vec<f32>) -> Result<(), NapcasError> {
        let mut guard = self.write_data();
        if delta.len() != guard.numel() {
            return Err(NapcasError::ShapeMismatch {
                expected: guard.shape.clone(),
                actual: vec![delta.len()],
                operation: "accumulate_grad".to_string(),
            });
        }
        let summed = match guard.grad.as_ref() {
            Some(existing) => existing
                .get_f32_data()
                .iter()
                .zip(delta)
                .map(|(a, b)| a + b)
                .collect(),
            None => delta,
        };
        guard.grad = Some(Tensor::from_raw(summed, guard.shape.clone()));
        Ok(())
    }

    /// Computes gradients of this scalar with respect to every leaf that
    /// requires grad, accumulating them into the leaves' `grad`.
    ///
    /// The graph nodes consumed by the traversal are released; a second call
    /// over the same graph fails. Use [`Tensor::backward_retain_graph`] to keep it.
    ///
    /// # Errors
    /// * `NapcasError::InvalidBackwardCall` if the tensor is not a scalar, does not
    ///   require grad, or its graph was already released.
    /// * `NapcasError::UnsupportedGradient` if a recorded operation has no gradient.
    /// * `NapcasError::GraphCycle` if the recorded graph is not acyclic.
    pub fn backward(&self) -> Result<(), NapcasError> {
        run_backward(self, false)
    }

    /// Same as [`Tensor::backward`] but keeps the graph for another traversal.
    pub fn backward_retain_graph(&self) -> Result<(), NapcasError> {
        run_backward(self, true)
    }

    /// Returns a new leaf holding a copy of the values, cut from the graph.
    pub fn detach(&self) -> Tensor {
        let guard = self.read_data();
        Tensor::from_raw(guard.data.clone(), guard.shape.clone())
    }
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
