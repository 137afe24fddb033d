use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Element-wise natural exponential.
pub fn exp_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape): (Vec<f32>, Vec<usize>) = {
        let guard = a.read_data();
        (guard.data.iter().map(|x| x.exp()).collect(), guard.shape.clone())
    };
    let saved = data.clone();
    Ok(track(data, shape, &[a], move || Op::Exp {
        output: Arc::new(saved),
    }))
}

/// d(exp x)/dx = exp x, which is the saved output.
pub(crate) fn exp_backward(
    ctx: &BackwardContext,
    output: &[f32],
) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| {
        ctx.grad_output
            .iter()
            .zip(output)
            .map(|(g, y)| g * y)
            .collect()
    })])
}
