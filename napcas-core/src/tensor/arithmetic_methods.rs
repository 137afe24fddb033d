use crate::error::NapcasError;
use crate::ops::{arithmetic, linalg, math_elem};
use crate::tensor::Tensor;

/// Element-wise and linear-algebra methods. Each delegates to the tracked
/// operation in [`crate::ops`], which also records the graph node.
impl Tensor {
    /// Element-wise `self + other` with broadcasting.
    pub fn add(&self, other: &Tensor) -> Result<Tensor, NapcasError> {
        arithmetic::add_op(self, other)
    }

    /// Element-wise `self - other` with broadcasting.
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, NapcasError> {
        arithmetic::sub_op(self, other)
    }

    /// Element-wise `self * other` with broadcasting.
    pub fn mul(&self, other: &Tensor) -> Result<Tensor, NapcasError> {
        arithmetic::mul_op(self, other)
    }

    /// Element-wise `self / other` with broadcasting.
    pub fn div(&self, other: &Tensor) -> Result<Tensor, NapcasError> {
        arithmetic::div_op(self, other)
    }

    pub fn neg(&self) -> Result<Tensor, NapcasError> {
        arithmetic::neg_op(self)
    }

    pub fn add_scalar(&self, value: f32) -> Result<Tensor, NapcasError> {
        arithmetic::add_scalar_op(self, value)
    }

    pub fn mul_scalar(&self, factor: f32) -> Result<Tensor, NapcasError> {
        arithmetic::mul_scalar_op(self, factor)
    }

    /// Raises every element to `exponent`.
    pub fn pow_scalar(&self, exponent: f32) -> Result<Tensor, NapcasError> {
        math_elem::pow_scalar_op(self, exponent)
    }

    pub fn sqrt(&self) -> Result<Tensor, NapcasError> {
        math_elem::sqrt_op(self)
    }

    pub fn exp(&self) -> Result<Tensor, NapcasError> {
        math_elem::exp_op(self)
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Result<Tensor, NapcasError> {
        math_elem::ln_op(self)
    }

    /// Rounds to the nearest integer. Not differentiable: a backward pass
    /// through the result fails.
    pub fn round(&self) -> Result<Tensor, NapcasError> {
        math_elem::round_op(self)
    }

    /// Matrix product, see [`linalg::matmul_op`].
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, NapcasError> {
        linalg::matmul_op(self, other)
    }
}
