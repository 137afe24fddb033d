use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::arithmetic::broadcast_binary;
use crate::ops::track;
use crate::tensor::utils::reduce_gradient;
use crate::tensor::Tensor;

// --- Forward Operation ---

/// Performs element-wise addition of two tensors with broadcasting.
///
/// # Errors
/// Returns `NapcasError::BroadcastError` if the shapes are not broadcastable.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = broadcast_binary(a, b, |x, y| x + y)?;
    Ok(track(data, shape, &[a, b], || Op::Add))
}

// --- Backward Operation ---

/// dL/da = dL/dc and dL/db = dL/dc, each summed over its broadcast axes.
pub(crate) fn add_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let grad = ctx.grad_output;
    Ok((0..2)
        .map(|i| {
            ctx.needs(i)
                .then(|| reduce_gradient(grad, ctx.output_shape, &ctx.input_shape(i)))
        })
        .collect())
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
