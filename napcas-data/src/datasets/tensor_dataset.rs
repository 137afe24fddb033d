use crate::dataset::Dataset;
use napcas_core::autograd::no_grad;
use napcas_core::{NapcasError, Tensor};

/// A dataset wrapping an input tensor and a target tensor.
///
/// Sample `i` is the pair of slices at position `i` of the leading axis of
/// both tensors, with that axis removed (rows of a `[N, F]` tensor come out
/// as `[F]`, elements of a `[N]` tensor as scalars).
#[derive(Debug, Clone)]
pub struct TensorDataset {
    inputs: Tensor,
    targets: Tensor,
    len: usize,
}

impl TensorDataset {
    /// # Errors
    /// Returns `NapcasError::ShapeMismatch` if either tensor is 0-D or their
    /// leading dimensions differ.
    pub fn new(inputs: Tensor, targets: Tensor) -> Result<Self, NapcasError> {
        let (input_shape, target_shape) = (inputs.shape(), targets.shape());
        let len = match (input_shape.first(), target_shape.first()) {
            (Some(&n), Some(&m)) if n == m => n,
            _ => {
                return Err(NapcasError::ShapeMismatch {
                    expected: input_shape.first().map(|&n| vec![n]).unwrap_or_default(),
                    actual: target_shape,
                    operation: "TensorDataset::new (leading dimensions must match)".to_string(),
                })
            }
        };
        Ok(TensorDataset {
            inputs,
            targets,
            len,
        })
    }

    pub fn inputs(&self) -> &Tensor {
        &self.inputs
    }

    pub fn targets(&self) -> &Tensor {
        &self.targets
    }
}

fn sample(tensor: &Tensor, index: usize) -> Result<Tensor, NapcasError> {
    let shape = tensor.shape();
    tensor.narrow(0, index, 1)?.reshape(&shape[1..])
}

impl Dataset for TensorDataset {
    type Item = (Tensor, Tensor);

    fn get(&self, index: usize) -> Result<Self::Item, NapcasError> {
        if index >= self.len {
            return Err(NapcasError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![self.len],
            });
        }
        let _guard = no_grad();
        Ok((sample(&self.inputs, index)?, sample(&self.targets, index)?))
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
#[path = "tensor_dataset_test.rs"]
mod tests;
