//! Spatial operations on `[N, C, H, W]` tensors.
//!
//! Both carry a dedicated backward rule: convolution lowers each sample to a
//! column matrix (im2col) so forward and backward are plain matrix products,
//! and pooling scatters the gradient back through the saved argmax indices.

pub mod conv2d;
pub mod max_pool2d;

pub use conv2d::conv2d_op;
pub use max_pool2d::max_pool2d_op;

use crate::error::NapcasError;

/// Unpacks a `[N, C, H, W]` shape.
pub(crate) fn nchw(shape: &[usize], operation: &str) -> Result<[usize; 4], NapcasError> {
    match shape {
        [n, c, h, w] => Ok([*n, *c, *h, *w]),
        _ => Err(NapcasError::ShapeMismatch {
            expected: vec![0, 0, 0, 0],
            actual: shape.to_vec(),
            operation: format!("{} (expects a rank-4 [N, C, H, W] input)", operation),
        }),
    }
}

/// Number of window positions along one spatial axis.
pub(crate) fn output_extent(
    size: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
) -> Option<usize> {
    let padded = size + 2 * padding;
    (padded >= kernel).then(|| (padded - kernel) / stride + 1)
}
