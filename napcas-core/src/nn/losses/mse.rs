use crate::error::NapcasError;
use crate::nn::losses::check_same_shape;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Specifies the reduction to apply to the per-element losses:
/// `"mean"` | `"sum"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    #[default]
    Mean,
    Sum,
}

impl FromStr for Reduction {
    type Err = NapcasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(Reduction::Mean),
            "sum" => Ok(Reduction::Sum),
            _ => Err(NapcasError::ConfigurationError(format!(
                "Unsupported reduction type: {}",
                s
            ))),
        }
    }
}

impl Reduction {
    pub(crate) fn apply(&self, losses: &Tensor) -> Result<Tensor, NapcasError> {
        match self {
            Reduction::Mean => losses.mean(),
            Reduction::Sum => losses.sum(),
        }
    }
}

/// Computes the Mean Squared Error (MSE) loss between input and target tensors.
///
/// The loss is the mean (or sum) of `(input - target)^2` over all elements.
/// Gradients flow to whichever of the two requires them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss {
    reduction: Reduction,
}

impl MSELoss {
    pub fn new(reduction: Reduction) -> Self {
        MSELoss { reduction }
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// # Errors
    /// Returns `NapcasError::ShapeMismatch` if `input` and `target` differ in shape.
    pub fn calculate(&self, input: &Tensor, target: &Tensor) -> Result<Tensor, NapcasError> {
        check_same_shape(input, target, "MSELoss")?;
        let diff = input.sub(target)?;
        self.reduction.apply(&diff.mul(&diff)?)
    }
}

#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;
