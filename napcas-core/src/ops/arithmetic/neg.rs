use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

/// Element-wise negation.
pub fn neg_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        (guard.data.iter().map(|x| -x).collect(), guard.shape.clone())
    };
    Ok(track(data, shape, &[a], || Op::Neg))
}

pub(crate) fn neg_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx
        .needs(0)
        .then(|| ctx.grad_output.iter().map(|g| -g).collect())])
}
