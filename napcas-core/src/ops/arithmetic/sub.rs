use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::track;
use crate::tensor::utils::reduce_gradient;
use crate::tensor::Tensor;

/// Performs element-wise subtraction `a - b` with broadcasting.
///
/// # Errors
/// Returns `NapcasError::BroadcastError` if the shapes are not broadcastable.
pub fn sub_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = broadcast_binary(a, b, |x, y| x - y)?;
    Ok(track(data, shape, &[a, b], || Op::Sub))
}

pub(crate) fn sub_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let grad = ctx.grad_output;
    let grad_a = ctx
        .needs(0)
        .then(|| reduce_gradient(grad, ctx.output_shape, &ctx.input_shape(0)));
    let grad_b = ctx.needs(1).then(|| {
        let negated: Vec<f32> = grad.iter().map(|g| -g).collect();
        reduce_gradient(&negated, ctx.output_shape, &ctx.input_shape(1))
    });
    Ok(vec![grad_a, grad_b])
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
