use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::ops::view::split_at_dim;
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Numerically stable softmax of `data` along `axis`.
pub(crate) fn softmax_along(data: &[f32], shape: &[usize], axis: usize) -> Vec<f32> {
    let (outer, size, inner) = split_at_dim(shape, axis);
    let mut out = vec![0.0f32; data.len()];
    for o in 0..outer {
        for j in 0..inner {
            let index = |p: usize| (o * size + p) * inner + j;
            let max = (0..size)
                .map(|p| data[index(p)])
                .fold(f32::NEG_INFINITY, f32::max);
            let mut total = 0.0f32;
            for p in 0..size {
                let e = (data[index(p)] - max).exp();
                out[index(p)] = e;
                total += e;
            }
            for p in 0..size {
                out[index(p)] /= total;
            }
        }
    }
    out
}

/// Softmax along `axis`.
///
/// # Errors
/// Returns `NapcasError::InvalidDimension` if `axis` is out of range.
pub fn softmax_op(a: &Tensor, axis: usize) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        check_dim(axis, guard.shape.len())?;
        (softmax_along(&guard.data, &guard.shape, axis), guard.shape.clone())
    };
    let saved = data.clone();
    Ok(track(data, shape, &[a], move || Op::Softmax {
        axis,
        output: Arc::new(saved),
    }))
}

/// dx = y * (g - sum(g * y)) along the softmax axis.
pub(crate) fn softmax_backward(
    ctx: &BackwardContext,
    axis: usize,
    output: &[f32],
) -> Result<InputGrads, NapcasError> {
    if !ctx.needs(0) {
        return Ok(vec![None]);
    }
    let (outer, size, inner) = split_at_dim(ctx.output_shape, axis);
    let grad = ctx.grad_output;
    let mut out = vec![0.0f32; grad.len()];
    for o in 0..outer {
        for j in 0..inner {
            let index = |p: usize| (o * size + p) * inner + j;
            let dot: f32 = (0..size).map(|p| grad[index(p)] * output[index(p)]).sum();
            for p in 0..size {
                out[index(p)] = output[index(p)] * (grad[index(p)] - dot);
            }
        }
    }
    Ok(vec![Some(out)])
}

#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
