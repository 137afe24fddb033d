use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Row-wise log-softmax over the trailing `classes` axis.
fn log_softmax_rows(logits: &[f32], classes: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(logits.len());
    for row in logits.chunks(classes) {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let log_total = row.iter().map(|v| (v - max).exp()).sum::<f32>().ln() + max;
        out.extend(row.iter().map(|v| v - log_total));
    }
    out
}

// --- Forward Operation ---

/// Fused softmax cross-entropy.
///
/// `logits` and `target` share a shape whose last axis holds the classes;
/// every other axis indexes samples. `target` rows are class distributions
/// (usually one-hot). The result is the scalar mean over samples of
/// `-sum(target * log_softmax(logits))`.
///
/// # Errors
/// Returns `NapcasError::ShapeMismatch` if the shapes differ or the logits are 0-dimensional.
pub fn cross_entropy_op(logits: &Tensor, target: &Tensor) -> Result<Tensor, NapcasError> {
    let (x, x_shape) = logits.snapshot();
    let (t, t_shape) = target.snapshot();
    if x_shape != t_shape || x_shape.is_empty() {
        return Err(NapcasError::ShapeMismatch {
            expected: x_shape,
            actual: t_shape,
            operation: "cross_entropy".to_string(),
        });
    }
    let classes = x_shape[x_shape.len() - 1];
    let samples = (x.len() / classes) as f32;
    let log_probs = log_softmax_rows(&x, classes);
    let loss = -log_probs.iter().zip(&t).map(|(lp, tv)| lp * tv).sum::<f32>() / samples;

    Ok(track(vec![loss], vec![], &[logits, target], move || {
        Op::CrossEntropy {
            log_probs: Arc::new(log_probs),
        }
    }))
}

// --- Backward Operation ---

/// dL/dlogits = g * (softmax * sum(target) - target) / N per row, and
/// dL/dtarget = -g * log_softmax / N.
pub(crate) fn cross_entropy_backward(
    ctx: &BackwardContext,
    log_probs: &[f32],
) -> Result<InputGrads, NapcasError> {
    let shape = ctx.input_shape(0);
    let classes = shape[shape.len() - 1];
    let samples = (log_probs.len() / classes) as f32;
    let scale = ctx.grad_output[0] / samples;

    let grad_logits = ctx.needs(0).then(|| {
        let target = ctx.input_data(1);
        let mut grad = Vec::with_capacity(target.len());
        for (lp_row, t_row) in log_probs.chunks(classes).zip(target.chunks(classes)) {
            let mass: f32 = t_row.iter().sum();
            grad.extend(
                lp_row
                    .iter()
                    .zip(t_row)
                    .map(|(lp, tv)| scale * (lp.exp() * mass - tv)),
            );
        }
        grad
    });
    let grad_target = ctx
        .needs(1)
        .then(|| log_probs.iter().map(|lp| -scale * lp).collect());
    Ok(vec![grad_logits, grad_target])
}

#[cfg(test)]
#[path = "cross_entropy_test.rs"]
mod tests;
