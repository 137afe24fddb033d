use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::track;
use crate::tensor::utils::{expand_data, reduce_gradient};
use crate::tensor::Tensor;

/// Performs element-wise division `a / b` with broadcasting.
///
/// Division by zero follows IEEE semantics (inf or NaN), it is not an error.
///
/// # Errors
/// Returns `NapcasError::BroadcastError` if the shapes are not broadcastable.
pub fn div_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = broadcast_binary(a, b, |x, y| x / y)?;
    Ok(track(data, shape, &[a, b], || Op::Div))
}

/// dL/da = g / b and dL/db = -g * a / b^2.
pub(crate) fn div_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let grad = ctx.grad_output;
    let out_shape = ctx.output_shape;
    let b = expand_data(&ctx.input_data(1), &ctx.input_shape(1), out_shape);

    let grad_a = ctx.needs(0).then(|| {
        let local: Vec<f32> = grad.iter().zip(b.iter()).map(|(g, y)| g / y).collect();
        reduce_gradient(&local, out_shape, &ctx.input_shape(0))
    });
    let grad_b = ctx.needs(1).then(|| {
        let a = expand_data(&ctx.input_data(0), &ctx.input_shape(0), out_shape);
        let local: Vec<f32> = grad
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|(g, (x, y))| -g * x / (y * y))
            .collect();
        reduce_gradient(&local, out_shape, &ctx.input_shape(1))
    });
    Ok(vec![grad_a, grad_b])
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
