//! Operations between a tensor and a constant.

use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

fn map_values(a: &Tensor, f: impl Fn(f32) -> f32) -> (Vec<f32>, Vec<usize>) {
    let guard = a.read_data();
    (guard.data.iter().map(|&x| f(x)).collect(), guard.shape.clone())
}

/// Adds a constant to every element.
pub fn add_scalar_op(a: &Tensor, value: f32) -> Result<Tensor, NapcasError> {
    let (data, shape) = map_values(a, |x| x + value);
    Ok(track(data, shape, &[a], || Op::AddScalar))
}

/// Multiplies every element by a constant.
pub fn mul_scalar_op(a: &Tensor, factor: f32) -> Result<Tensor, NapcasError> {
    let (data, shape) = map_values(a, |x| x * factor);
    Ok(track(data, shape, &[a], || Op::MulScalar { factor }))
}

pub(crate) fn add_scalar_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| ctx.grad_output.to_vec())])
}

pub(crate) fn mul_scalar_backward(
    ctx: &BackwardContext,
    factor: f32,
) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx
        .needs(0)
        .then(|| ctx.grad_output.iter().map(|g| g * factor).collect())])
}

#[cfg(test)]
#[path = "scalar_test.rs"]
mod tests;
