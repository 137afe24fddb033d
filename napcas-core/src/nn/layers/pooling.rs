use crate::error::NapcasError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;

/// Max pooling over square windows of `[N, C, H, W]` inputs.
#[derive(Debug, Clone, Copy)]
pub struct MaxPool2d {
    kernel_size: usize,
    stride: usize,
}

impl MaxPool2d {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if `kernel_size` or `stride` is zero.
    pub fn new(kernel_size: usize, stride: usize) -> Result<Self, NapcasError> {
        if kernel_size == 0 || stride == 0 {
            return Err(NapcasError::ConfigurationError(format!(
                "MaxPool2d kernel_size ({}) and stride ({}) must be positive",
                kernel_size, stride
            )));
        }
        Ok(MaxPool2d {
            kernel_size,
            stride,
        })
    }
}

impl Module for MaxPool2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.max_pool2d(self.kernel_size, self.stride)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }
}
