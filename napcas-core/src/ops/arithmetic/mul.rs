use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::track;
use crate::tensor::utils::{expand_data, reduce_gradient};
use crate::tensor::Tensor;

// --- Forward Operation ---

/// Performs element-wise multiplication with broadcasting.
///
/// # Errors
/// Returns `NapcasError::BroadcastError` if the shapes are not broadcastable.
pub fn mul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = broadcast_binary(a, b, |x, y| x * y)?;
    Ok(track(data, shape, &[a, b], || Op::Mul))
}

// --- Backward Operation ---

/// dL/da = dL/dc * b and dL/db = dL/dc * a, reduced to each input's shape.
pub(crate) fn mul_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let grad = ctx.grad_output;
    let out_shape = ctx.output_shape;
    let other_times_grad = |own: usize, other: usize| {
        let other_data = expand_data(&ctx.input_data(other), &ctx.input_shape(other), out_shape);
        let local: Vec<f32> = grad.iter().zip(other_data).map(|(g, o)| g * o).collect();
        reduce_gradient(&local, out_shape, &ctx.input_shape(own))
    };
    Ok(vec![
        ctx.needs(0).then(|| other_times_grad(0, 1)),
        ctx.needs(1).then(|| other_times_grad(1, 0)),
    ])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
