use crate::tensor::Tensor;
use std::fmt;
use std::ops::Deref;

/// A wrapper around a Tensor indicating it is a learnable parameter of a Module.
///
/// The wrapped tensor is always a leaf with `requires_grad` set. Cloning a
/// `Parameter` yields another handle to the same storage, which is how
/// optimizers and checkpoints reach the module's weights.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Parameter(Tensor);

impl Parameter {
    /// Creates a new Parameter from a Tensor.
    ///
    /// A tensor produced by an operation is detached first, so the parameter
    /// never keeps a graph alive.
    pub fn new(tensor: Tensor) -> Self {
        let tensor = if tensor.is_leaf() {
            tensor
        } else {
            tensor.detach()
        };
        Parameter(tensor.with_requires_grad())
    }

    /// Returns a handle to the underlying tensor.
    pub fn tensor(&self) -> &Tensor {
        &self.0
    }

    /// Consumes the Parameter and returns the underlying Tensor.
    pub fn into_inner(self) -> Tensor {
        self.0
    }
}

impl Deref for Parameter {
    type Target = Tensor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({:?})", self.0)
    }
}

#[cfg(test)]
#[path = "parameter_test.rs"]
mod tests;
