use crate::autograd::backward_op::Op;
use crate::error::NapcasError;
use crate::ops::reduction::reduced_shape;
use crate::ops::track;
use crate::ops::view::split_at_dim;
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;

/// Index of the largest element along `axis`, returned as `f32` values.
///
/// Ties resolve to the first index. The result is not differentiable.
///
/// # Errors
/// Returns `NapcasError::InvalidDimension` if `axis` is out of range.
pub fn argmax_op(a: &Tensor, axis: usize) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        check_dim(axis, guard.shape.len())?;
        let (outer, size, inner) = split_at_dim(&guard.shape, axis);
        let mut data = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            for j in 0..inner {
                let mut best = 0;
                for p in 1..size {
                    if guard.data[(o * size + p) * inner + j] > guard.data[(o * size + best) * inner + j] {
                        best = p;
                    }
                }
                data.push(best as f32);
            }
        }
        (data, reduced_shape(&guard.shape, axis, false))
    };
    Ok(track(data, shape, &[a], || Op::Argmax { axis }))
}
