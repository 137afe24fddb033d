//! Shape-manipulating operations.
//!
//! Tensors are always contiguous, so these operations copy data into the
//! new layout rather than producing strided views.

pub mod concat;
pub mod narrow;
pub mod permute;
pub mod reshape;

pub use concat::{concat_op, stack_op};
pub use narrow::narrow_op;
pub use permute::{permute_op, transpose_op};
pub use reshape::reshape_op;

/// Splits `shape` around `dim` into (outer, size, inner) element counts.
pub(crate) fn split_at_dim(shape: &[usize], dim: usize) -> (usize, usize, usize) {
    let outer = shape[..dim].iter().product();
    let inner = shape[dim + 1..].iter().product();
    (outer, shape[dim], inner)
}
