use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;
use std::sync::Arc;

fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Logistic function `1 / (1 + exp(-x))`.
pub fn sigmoid_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape): (Vec<f32>, Vec<usize>) = {
        let guard = a.read_data();
        (guard.data.iter().map(|&x| sigmoid(x)).collect(), guard.shape.clone())
    };
    let saved = data.clone();
    Ok(track(data, shape, &[a], move || Op::Sigmoid {
        output: Arc::new(saved),
    }))
}

/// dσ/dx = σ(x)(1 - σ(x)), from the saved output.
pub(crate) fn sigmoid_backward(
    ctx: &BackwardContext,
    output: &[f32],
) -> Result<InputGrads, NapcasError> {
    Ok(vec![ctx.needs(0).then(|| {
        ctx.grad_output
            .iter()
            .zip(output)
            .map(|(g, s)| g * s * (1.0 - s))
            .collect()
    })])
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
