use crate::error::NapcasError;
use crate::nn::losses::mse::Reduction;
use crate::tensor::Tensor;

/// Softmax cross-entropy between logits and target class distributions.
///
/// `logits` and `target` share a shape; classes run along the last axis and
/// every leading axis indexes a sample (a 1-D input is a single sample).
/// Targets are usually one-hot rows. Softmax and log are fused in one
/// operation so the loss stays finite for large logits.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropyLoss {
    reduction: Reduction,
}

impl CrossEntropyLoss {
    pub fn new(reduction: Reduction) -> Self {
        CrossEntropyLoss { reduction }
    }

    /// # Errors
    /// Returns `NapcasError::ShapeMismatch` if the shapes differ or the logits are 0-D.
    pub fn calculate(&self, logits: &Tensor, target: &Tensor) -> Result<Tensor, NapcasError> {
        let mean = logits.cross_entropy(target)?;
        match self.reduction {
            Reduction::Mean => Ok(mean),
            Reduction::Sum => {
                let shape = logits.shape();
                let samples = logits.numel() / shape.last().copied().unwrap_or(1);
                mean.mul_scalar(samples as f32)
            }
        }
    }
}

#[cfg(test)]
#[path = "cross_entropy_test.rs"]
mod tests;
