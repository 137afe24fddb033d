use crate::error::NapcasError;
use crate::ops::{activation, conv, loss};
use crate::tensor::Tensor;

impl Tensor {
    pub fn relu(&self) -> Result<Tensor, NapcasError> {
        activation::relu_op(self)
    }

    pub fn sigmoid(&self) -> Result<Tensor, NapcasError> {
        activation::sigmoid_op(self)
    }

    pub fn tanh(&self) -> Result<Tensor, NapcasError> {
        activation::tanh_op(self)
    }

    /// Softmax along `axis`.
    pub fn softmax(&self, axis: usize) -> Result<Tensor, NapcasError> {
        activation::softmax_op(self, axis)
    }

    /// See [`conv::conv2d_op`].
    pub fn conv2d(
        &self,
        weight: &Tensor,
        bias: Option<&Tensor>,
        stride: usize,
        padding: usize,
    ) -> Result<Tensor, NapcasError> {
        conv::conv2d_op(self, weight, bias, stride, padding)
    }

    pub fn max_pool2d(&self, kernel: usize, stride: usize) -> Result<Tensor, NapcasError> {
        conv::max_pool2d_op(self, kernel, stride)
    }

    /// Fused softmax cross-entropy of these logits against `target`.
    pub fn cross_entropy(&self, target: &Tensor) -> Result<Tensor, NapcasError> {
        loss::cross_entropy_op(self, target)
    }
}
