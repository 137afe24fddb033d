use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::reduction::{reduced_shape, spread_along, sum_along};
use crate::ops::track;
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;

/// Mean of all elements, as a 0-dimensional tensor.
pub fn mean_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let mean = {
        let guard = a.read_data();
        guard.data.iter().sum::<f32>() / guard.numel() as f32
    };
    Ok(track(vec![mean], vec![], &[a], || Op::Mean))
}

/// Mean over one axis.
///
/// # Errors
/// Returns `NapcasError::InvalidDimension` if `axis` is out of range.
pub fn mean_axis_op(a: &Tensor, axis: usize, keep_dim: bool) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        check_dim(axis, guard.shape.len())?;
        let n = guard.shape[axis] as f32;
        let data: Vec<f32> = sum_along(&guard.data, &guard.shape, axis)
            .into_iter()
            .map(|s| s / n)
            .collect();
        (data, reduced_shape(&guard.shape, axis, keep_dim))
    };
    Ok(track(data, shape, &[a], || Op::MeanAxis { axis }))
}

pub(crate) fn mean_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let numel = ctx.inputs[0].numel();
    let g = ctx.grad_output[0] / numel as f32;
    Ok(vec![ctx.needs(0).then(|| vec![g; numel])])
}

pub(crate) fn mean_axis_backward(
    ctx: &BackwardContext,
    axis: usize,
) -> Result<InputGrads, NapcasError> {
    let shape = ctx.input_shape(0);
    let scale = 1.0 / shape[axis] as f32;
    Ok(vec![ctx
        .needs(0)
        .then(|| spread_along(ctx.grad_output, &shape, axis, scale))])
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;
