use crate::error::NapcasError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;

/// Collapses all axes from `start_dim` on, e.g. `[N, C, H, W] -> [N, C*H*W]`.
#[derive(Debug, Clone, Copy)]
pub struct Flatten {
    start_dim: usize,
}

impl Flatten {
    pub fn new(start_dim: usize) -> Self {
        Flatten { start_dim }
    }
}

impl Default for Flatten {
    /// Keeps the batch axis.
    fn default() -> Self {
        Flatten { start_dim: 1 }
    }
}

impl Module for Flatten {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.flatten(self.start_dim)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }
}
