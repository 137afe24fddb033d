use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

/// Rectified linear unit, `max(0, x)`.
pub fn relu_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        (
            guard.data.iter().map(|&x| if x > 0.0 { x } else { 0.0 }).collect(),
            guard.shape.clone(),
        )
    };
    Ok(track(data, shape, &[a], || Op::Relu))
}

/// The gradient passes where the input was strictly positive.
pub(crate) fn relu_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| {
        ctx.grad_output
            .iter()
            .zip(ctx.input_data(0))
            .map(|(&g, x)| if x > 0.0 { g } else { 0.0 })
            .collect()
    })])
}

#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
