use crate::error::NapcasError;
use crate::nn::losses::check_same_shape;
use crate::nn::losses::mse::Reduction;
use crate::tensor::Tensor;

/// Added inside both logarithms so that saturated probabilities stay finite.
pub const BCE_EPSILON: f32 = 1e-10;

/// Binary cross-entropy on probabilities:
/// `-(t * ln(p + eps) + (1 - t) * ln(1 - p + eps))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BCELoss {
    reduction: Reduction,
}

impl BCELoss {
    pub fn new(reduction: Reduction) -> Self {
        BCELoss { reduction }
    }

    /// # Errors
    /// Returns `NapcasError::ShapeMismatch` if `prediction` and `target` differ in shape.
    pub fn calculate(&self, prediction: &Tensor, target: &Tensor) -> Result<Tensor, NapcasError> {
        check_same_shape(prediction, target, "BCELoss")?;
        let log_p = prediction.add_scalar(BCE_EPSILON)?.ln()?;
        let log_not_p = prediction.neg()?.add_scalar(1.0 + BCE_EPSILON)?.ln()?;
        let not_t = target.neg()?.add_scalar(1.0)?;
        let losses = target
            .mul(&log_p)?
            .add(&not_t.mul(&log_not_p)?)?
            .neg()?;
        self.reduction.apply(&losses)
    }
}

#[cfg(test)]
#[path = "bce_test.rs"]
mod tests;
