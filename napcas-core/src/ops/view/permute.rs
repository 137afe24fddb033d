use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::utils::{calculate_strides, check_dim, index_to_coord};
use crate::tensor::Tensor;

/// For each output element, the linear index of the input element it reads.
fn source_indices(in_shape: &[usize], dims: &[usize]) -> Vec<usize> {
    let in_strides = calculate_strides(in_shape);
    let out_shape: Vec<usize> = dims.iter().map(|&d| in_shape[d]).collect();
    let out_strides = calculate_strides(&out_shape);
    let numel: usize = in_shape.iter().product();
    (0..numel)
        .map(|i| {
            index_to_coord(i, &out_strides, &out_shape)
                .iter()
                .zip(dims)
                .map(|(c, &d)| c * in_strides[d])
                .sum()
        })
        .collect()
}

/// Reorders the dimensions: output dim `i` is input dim `dims[i]`.
///
/// # Errors
/// * `NapcasError::InvalidDimension` if a dim is out of range.
/// * `NapcasError::ShapeError` if `dims` is not a permutation of the axes.
pub fn permute_op(a: &Tensor, dims: &[usize]) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        let rank = guard.shape.len();
        for &d in dims {
            check_dim(d, rank)?;
        }
        let mut seen = vec![false; rank];
        dims.iter().for_each(|&d| seen[d] = true);
        if dims.len() != rank || seen.iter().any(|s| !s) {
            return Err(NapcasError::ShapeError {
                shape: guard.shape.clone(),
                reason: format!("{:?} is not a permutation of the tensor's axes", dims),
            });
        }
        let data: Vec<f32> = source_indices(&guard.shape, dims)
            .into_iter()
            .map(|src| guard.data[src])
            .collect();
        let shape = dims.iter().map(|&d| guard.shape[d]).collect();
        (data, shape)
    };
    Ok(track(data, shape, &[a], || Op::Permute {
        dims: dims.to_vec(),
    }))
}

/// Swaps two dimensions.
pub fn transpose_op(a: &Tensor, dim0: usize, dim1: usize) -> Result<Tensor, NapcasError> {
    let rank = a.rank();
    check_dim(dim0, rank)?;
    check_dim(dim1, rank)?;
    let mut dims: Vec<usize> = (0..rank).collect();
    dims.swap(dim0, dim1);
    permute_op(a, &dims)
}

/// Scatters the gradient back through the same index mapping.
pub(crate) fn permute_backward(
    ctx: &BackwardContext,
    dims: &[usize],
) -> Result<InputGrads, NapcasError> {
    if !ctx.needs(0) {
        return Ok(vec![None]);
    }
    let in_shape = ctx.input_shape(0);
    let mut grad = vec![0.0f32; ctx.grad_output.len()];
    for (g, src) in ctx.grad_output.iter().zip(source_indices(&in_shape, dims)) {
        grad[src] = *g;
    }
    Ok(vec![Some(grad)])
}

#[cfg(test)]
#[path = "permute_test.rs"]
mod tests;
