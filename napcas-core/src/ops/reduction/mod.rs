pub mod argmax;
pub mod mean;
pub mod sum;

pub use argmax::argmax_op;
pub use mean::{mean_axis_op, mean_op};
pub use sum::{sum_axis_op, sum_op};

use crate::ops::view::split_at_dim;

/// Output shape of a reduction over `axis`.
pub(crate) fn reduced_shape(shape: &[usize], axis: usize, keep_dim: bool) -> Vec<usize> {
    let mut out = shape.to_vec();
    if keep_dim {
        out[axis] = 1;
    } else {
        out.remove(axis);
    }
    out
}

/// Sums `data` (of `shape`) over `axis`, in the reduced row-major order.
pub(crate) fn sum_along(data: &[f32], shape: &[usize], axis: usize) -> Vec<f32> {
    let (outer, size, inner) = split_at_dim(shape, axis);
    let mut out = vec![0.0f32; outer * inner];
    for o in 0..outer {
        for p in 0..size {
            let row = &data[(o * size + p) * inner..(o * size + p + 1) * inner];
            for (acc, v) in out[o * inner..(o + 1) * inner].iter_mut().zip(row) {
                *acc += v;
            }
        }
    }
    out
}

/// Repeats a reduced gradient along `axis`, scaled by `scale`.
pub(crate) fn spread_along(grad: &[f32], shape: &[usize], axis: usize, scale: f32) -> Vec<f32> {
    let (outer, size, inner) = split_at_dim(shape, axis);
    let mut out = Vec::with_capacity(outer * size * inner);
    for o in 0..outer {
        let row = &grad[o * inner..(o + 1) * inner];
        for _ in 0..size {
            out.extend(row.iter().map(|g| g * scale));
        }
    }
    out
}
