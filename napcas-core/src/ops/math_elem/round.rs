use crate::autograd::backward_op::Op;
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

/// Rounds every element to the nearest integer.
///
/// Recorded in the graph like any other operation, but it has no gradient:
/// a backward pass through it fails with `UnsupportedGradient`.
pub fn round_op(a: &Tensor) -> Result<Tensor, NapcasError> {
    let (data, shape) = {
        let guard = a.read_data();
        (guard.data.iter().map(|x| x.round()).collect(), guard.shape.clone())
    };
    Ok(track(data, shape, &[a], || Op::Round))
}
