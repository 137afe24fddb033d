pub mod add;
pub mod div;
pub mod mul;
pub mod neg;
pub mod scalar;
pub mod sub;

pub use add::add_op;
pub use div::div_op;
pub use mul::mul_op;
pub use neg::neg_op;
pub use scalar::{add_scalar_op, mul_scalar_op};
pub use sub::sub_op;

use crate::error::NapcasError;
use crate::tensor::utils::{broadcast_shapes, expand_data};
use crate::tensor::Tensor;

/// Applies `f` element-wise over `a` and `b` broadcast to a common shape.
///
/// # Errors
/// Returns `NapcasError::BroadcastError` if the shapes are not broadcastable.
pub(crate) fn broadcast_binary(
    a: &Tensor,
    b: &Tensor,
    f: impl Fn(f32, f32) -> f32,
) -> Result<(Vec<f32>, Vec<usize>), NapcasError> {
    // One lock at a time: `a` and `b` may be the same tensor.
    let (a_data, a_shape) = a.snapshot();
    let (b_data, b_shape) = b.snapshot();
    let output_shape = broadcast_shapes(&a_shape, &b_shape)?;

    let data = if a_shape == b_shape {
        a_data.iter().zip(b_data.iter()).map(|(&x, &y)| f(x, y)).collect()
    } else {
        let a_data = expand_data(&a_data, &a_shape, &output_shape);
        let b_data = expand_data(&b_data, &b_shape, &output_shape);
        a_data.into_iter().zip(b_data).map(|(x, y)| f(x, y)).collect()
    };
    Ok((data, output_shape))
}
