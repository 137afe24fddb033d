use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

/// Element-wise natural logarithm. Non-positive inputs yield -inf or NaN.
pub fn ln_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        (guard.data.iter().map(|x| x.ln()).collect(), guard.shape.clone())
    };
    Ok(track(data, shape, &[a], || Op::Ln))
}

pub(crate) fn ln_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| {
        ctx.grad_output
            .iter()
            .zip(ctx.input_data(0))
            .map(|(g, x)| g / x)
            .collect()
    })])
}
