use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::conv::{nchw, output_extent};
use crate::ops::track;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Max pooling over `kernel x kernel` windows of an `[N, C, H, W]` input.
///
/// Ties resolve to the first maximum in row-major window order.
///
/// # Errors
/// * `NapcasError::ConfigurationError` if `kernel` or `stride` is zero.
/// * `NapcasError::ShapeMismatch` for a non rank-4 input or a kernel larger than the input.
pub fn max_pool2d_op(input: &Tensor, kernel: usize, stride: usize) -> Result<Tensor, NapcasError> {
    if kernel == 0 || stride == 0 {
        return Err(NapcasError::ConfigurationError(format!(
            "max_pool2d kernel ({}) and stride ({}) must be positive",
            kernel, stride
        )));
    }
    let (x, shape) = input.snapshot();
    let [batch, channels, height, width] = nchw(&shape, "max_pool2d")?;
    let (Some(out_h), Some(out_w)) = (
        output_extent(height, kernel, stride, 0),
        output_extent(width, kernel, stride, 0),
    ) else {
        return Err(NapcasError::ShapeMismatch {
            expected: vec![kernel, kernel],
            actual: shape,
            operation: "max_pool2d (kernel larger than input)".to_string(),
        });
    };

    let out_len = batch * channels * out_h * out_w;
    let mut data = Vec::with_capacity(out_len);
    let mut argmax = Vec::with_capacity(out_len);
    for plane in 0..batch * channels {
        let base = plane * height * width;
        for oi in 0..out_h {
            for oj in 0..out_w {
                let mut best = base + oi * stride * width + oj * stride;
                for ki in 0..kernel {
                    for kj in 0..kernel {
                        let idx = base + (oi * stride + ki) * width + oj * stride + kj;
                        if x[idx] > x[best] {
                            best = idx;
                        }
                    }
                }
                data.push(x[best]);
                argmax.push(best);
            }
        }
    }

    Ok(track(
        data,
        vec![batch, channels, out_h, out_w],
        &[input],
        move || Op::MaxPool2d {
            argmax: Arc::new(argmax),
        },
    ))
}

/// Routes each output gradient to the input element that won its window.
pub(crate) fn max_pool2d_backward(
    ctx: &BackwardContext,
    argmax: &[usize],
) -> Result<InputGrads, NapcasError> {
    if !ctx.needs(0) {
        return Ok(vec![None]);
    }
    let mut grad = vec![0.0f32; ctx.inputs[0].numel()];
    for (&g, &idx) in ctx.grad_output.iter().zip(argmax) {
        grad[idx] += g;
    }
    Ok(vec![Some(grad)])
}

#[cfg(test)]
#[path = "max_pool2d_test.rs"]
mod tests;
