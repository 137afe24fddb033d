use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::reduction::{reduced_shape, spread_along, sum_along};
use crate::ops::track;
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;

/// Sums all elements into a 0-dimensional tensor.
pub fn sum_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let total: f32 = a.read_data().data.iter().sum();
    Ok(track(vec![total], vec![], &[a], || Op::Sum))
}

/// Sums over one axis.
///
/// # Errors
/// Returns `NapcasError::InvalidDimension` if `axis` is out of range.
pub fn sum_axis_op(a: &Tensor, axis: usize, keep_dim: bool) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        check_dim(axis, guard.shape.len())?;
        (
            sum_along(&guard.data, &guard.shape, axis),
            reduced_shape(&guard.shape, axis, keep_dim),
        )
    };
    Ok(track(data, shape, &[a], || Op::SumAxis { axis }))
}

pub(crate) fn sum_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let numel = ctx.inputs[0].numel();
    Ok(vec![ctx.needs(0).then(|| vec![ctx.grad_output[0]; numel])])
}

pub(crate) fn sum_axis_backward(ctx: &BackwardContext, axis: usize) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx
        .needs(0)
        .then(|| spread_along(ctx.grad_output, &ctx.input_shape(0), axis, 1.0))])
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
