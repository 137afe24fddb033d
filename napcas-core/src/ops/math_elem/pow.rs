use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

/// Raises every element to a constant power.
pub fn pow_scalar_op(a: &Tensor, exponent: f32) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        (
            guard.data.iter().map(|x| x.powf(exponent)).collect(),
            guard.shape.clone(),
        )
    };
    Ok(track(data, shape, &[a], || Op::PowScalar { exponent }))
}

/// Element-wise square root, recorded as `pow(x, 0.5)`.
pub fn sqrt_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    pow_scalar_op(a, 0.5)
}

/// d(x^p)/dx = p * x^(p-1).
pub(crate) fn pow_scalar_backward(
    ctx: &BackwardContext,
    exponent: f32,
) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| {
        ctx.grad_output
            .iter()
            .zip(ctx.input_data(0))
            .map(|(g, x)| g * exponent * x.powf(exponent - 1.0))
            .collect()
    })])
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
