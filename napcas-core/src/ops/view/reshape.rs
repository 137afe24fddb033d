use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::utils::validate_shape;
use crate::tensor::Tensor;

/// Returns a tensor with the same values laid out in `new_shape`.
///
/// # Errors
/// * `NapcasError::ShapeError` if `new_shape` has a zero dimension.
/// * `NapcasError::ShapeMismatch` if the element counts differ.
pub fn reshape_op(a: &Tensor, new_shape: &[usize]) -> Result<Tensor, NapcasError> {
    validate_shape(new_shape)?;
    let (data, shape) = {
        let guard = a.read_data();
        let new_numel: usize = new_shape.iter().product();
        if new_numel != guard.numel() {
            return Err(NapcasError::ShapeMismatch {
                expected: guard.shape.clone(),
                actual: new_shape.to_vec(),
                operation: "reshape (element count)".to_string(),
            });
        }
        (guard.data.clone(), new_shape.to_vec())
    };
    Ok(track(data, shape, &[a], || Op::Reshape))
}

pub(crate) fn reshape_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| ctx.grad_output.to_vec())])
}

#[cfg(test)]
#[path = "reshape_test.rs"]
mod tests;
