use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Hyperbolic tangent.
pub fn tanh_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape): (Vec<f32>, Vec<usize>) = {
        let guard = a.read_data();
        (guard.data.iter().map(|x| x.tanh()).collect(), guard.shape.clone())
    };
    let saved = data.clone();
    Ok(track(data, shape, &[a], move || Op::Tanh {
        output: Arc::new(saved),
    }))
}

pub(crate) fn tanh_backward(
    ctx: &BackwardContext,
    output: &[f32],
) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| {
        ctx.grad_output
            .iter()
            .zip(output)
            .map(|(g, t)| g * (1.0 - t * t))
            .collect()
    })])
}
