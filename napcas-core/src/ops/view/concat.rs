use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::ops::view::{reshape_op, split_at_dim};
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;

/// Concatenates tensors along an existing dimension.
///
/// # Errors
/// * `NapcasError::ShapeError` if `tensors` is empty.
/// * `NapcasError::InvalidDimension` if `dim` is out of range.
/// * `NapcasError::ShapeMismatch` if the shapes differ outside of `dim`.
pub fn concat_op(tensors: &[Tensor], dim: usize) -> Result<Tensor, NapcasError> {
    let first = tensors.first().ok_or_else(|| NapcasError::ShapeError {
        shape: vec![],
        reason: "cannot concatenate an empty list of tensors".to_string(),
    })?;
    let first_shape = first.shape();
    check_dim(dim, first_shape.len())?;

    let mut out_shape = first_shape.clone();
    out_shape[dim] = 0;
    for t in tensors {
        let shape = t.shape();
        let compatible = shape.len() == first_shape.len()
            && shape
                .iter()
                .zip(first_shape.iter())
                .enumerate()
                .all(|(i, (a, b))| i == dim || a == b);
        if !compatible {
            return Err(NapcasError::ShapeMismatch {
                expected: first_shape,
                actual: shape,
                operation: format!("concat (dim {})", dim),
            });
        }
        out_shape[dim] += shape[dim];
    }

    let (outer, _, inner) = split_at_dim(&out_shape, dim);
    let mut data = Vec::with_capacity(out_shape.iter().product());
    let parts: Vec<(Vec<f32>, usize)> = tensors
        .iter()
        .map(|t| {
            let guard = t.read_data();
            (guard.data.clone(), guard.shape[dim] * inner)
        })
        .collect();
    for o in 0..outer {
        for (part, chunk) in &parts {
            data.extend_from_slice(&part[o * chunk..(o + 1) * chunk]);
        }
    }

    let inputs: Vec<&Tensor> = tensors.iter().collect();
    Ok(track(data, out_shape, &inputs, || Op::Concat { dim }))
}

/// Stacks equally-shaped tensors along a new dimension `dim`.
///
/// # Errors
/// Same as [`concat_op`]; `dim` may be at most the inputs' rank.
pub fn stack_op(tensors: &[Tensor], dim: usize) -> Result<Tensor, NapcasError> {
    let expanded = tensors
        .iter()
        .map(|t| {
            let mut shape = t.shape();
            if dim > shape.len() {
                return Err(NapcasError::InvalidDimension {
                    dim,
                    rank: shape.len() + 1,
                });
            }
            shape.insert(dim, 1);
            reshape_op(t, &shape)
        })
        .collect::<Result<Vec<_>, _>>()?;
    concat_op(&expanded, dim)
}

/// Splits the gradient back into one slice per input.
pub(crate) fn concat_backward(ctx: &BackwardContext, dim: usize) -> Result<InputGrads, NapcasError> {
    let (outer, total, inner) = split_at_dim(ctx.output_shape, dim);
    let mut offset = 0;
    let mut grads = Vec::with_capacity(ctx.inputs.len());
    for i in 0..ctx.inputs.len() {
        let size = ctx.input_shape(i)[dim];
        if ctx.needs(i) {
            let mut grad = Vec::with_capacity(outer * size * inner);
            for o in 0..outer {
                let begin = (o * total + offset) * inner;
                grad.extend_from_slice(&ctx.grad_output[begin..begin + size * inner]);
            }
            grads.push(Some(grad));
        } else {
            grads.push(None);
        }
        offset += size;
    }
    Ok(grads)
}

#[cfg(test)]
#[path = "concat_test.rs"]
mod tests;
