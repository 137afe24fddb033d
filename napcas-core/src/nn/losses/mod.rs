//! Loss functions. Each one reduces a prediction/target pair to a scalar
//! tensor whose backward pass reaches the prediction.

pub mod bce;
pub mod cross_entropy;
pub mod mse;

pub use bce::BCELoss;
pub use cross_entropy::CrossEntropyLoss;
pub use mse::{MSELoss, Reduction};

use crate::error::NapcasError;
use crate::tensor::Tensor;

pub(crate) fn check_same_shape(input: &Tensor, target: &Tensor, loss: &str) -> Result<(), NapcasError> {
    if input.shape() != target.shape() {
        return Err(NapcasError::ShapeMismatch {
            expected: target.shape(),
            actual: input.shape(),
            operation: format!("{} calculate", loss),
        });
    }
    Ok(())
}
