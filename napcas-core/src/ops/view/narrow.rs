use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::ops::view::split_at_dim;
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;

/// Returns the slice `start..start + length` along `dim`.
///
/// # Errors
/// * `NapcasError::InvalidDimension` if `dim` is out of range.
/// * `NapcasError::IndexOutOfBounds` if the range is empty or exceeds the dimension.
pub fn narrow_op(a: &Tensor, dim: usize, start: usize, length: usize) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        check_dim(dim, guard.shape.len())?;
        if length == 0 || start + length > guard.shape[dim] {
            return Err(NapcasError::IndexOutOfBounds {
                index: vec![start, start + length],
                shape: guard.shape.clone(),
            });
        }
        let (outer, size, inner) = split_at_dim(&guard.shape, dim);
        let mut data = Vec::with_capacity(outer * length * inner);
        for o in 0..outer {
            let begin = (o * size + start) * inner;
            data.extend_from_slice(&guard.data[begin..begin + length * inner]);
        }
        let mut shape = guard.shape.clone();
        shape[dim] = length;
        (data, shape)
    };
    Ok(track(data, shape, &[a], || Op::Narrow { dim, start }))
}

pub(crate) fn narrow_backward(
    ctx: &BackwardContext,
    dim: usize,
    start: usize,
) -> Result<InputGrads, NapcasError> {
    if !ctx.needs(0) {
        return Ok(vec![None]);
    }
    let in_shape = ctx.input_shape(0);
    let (outer, size, inner) = split_at_dim(&in_shape, dim);
    let length = ctx.output_shape[dim];
    let mut grad = vec![0.0f32; outer * size * inner];
    for o in 0..outer {
        let begin = (o * size + start) * inner;
        let src = &ctx.grad_output[o * length * inner..(o + 1) * length * inner];
        grad[begin..begin + length * inner].copy_from_slice(src);
    }
    Ok(vec![Some(grad)])
}

#[cfg(test)]
#[path = "narrow_test.rs"]
mod tests;
