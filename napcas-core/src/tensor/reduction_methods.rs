use crate::{error::NapcasError, ops::reduction, tensor::Tensor};

impl Tensor {
    /// Sum of all elements as a 0-dimensional tensor.
    pub fn sum(&self) -> Result<Tensor, NapcasError> {
        reduction::sum_op(self)
    }

    /// Mean of all elements as a 0-dimensional tensor.
    pub fn mean(&self) -> Result<Tensor, NapcasError> {
        reduction::mean_op(self)
    }

    pub fn sum_axis(&self, axis: usize, keep_dim: bool) -> Result<Tensor, NapcasError> {
        reduction::sum_axis_op(self, axis, keep_dim)
    }

    pub fn mean_axis(&self, axis: usize, keep_dim: bool) -> Result<Tensor, NapcasError> {
        reduction::mean_axis_op(self, axis, keep_dim)
    }

    /// Index of the largest element along `axis`, stored as `f32`. The axis is removed.
    pub fn argmax(&self, axis: usize) -> Result<Tensor, NapcasError> {
        reduction::argmax_op(self, axis)
    }
}
