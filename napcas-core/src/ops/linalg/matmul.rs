use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::track;
use crate::tensor::Tensor;

// --- Kernels ---

/// Row-major `[m, k] x [k, n]` product.
pub(crate) fn matmul_kernel(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; m * n];
    for i in 0..m {
        let out_row = &mut out[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            for (o, &b_pj) in out_row.iter_mut().zip(b_row) {
                *o += a_ip * b_pj;
            }
        }
    }
    out
}

/// Transposes a row-major `[rows, cols]` matrix.
pub(crate) fn transpose_2d(data: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = data[r * cols + c];
        }
    }
    out
}

/// (batch, m, k, n) of a valid product.
fn matmul_dims(a_shape: &[usize], b_shape: &[usize]) -> Result<(usize, usize, usize, usize), NapcasError> {
    let (batch, m, k, k2, n) = match (a_shape, b_shape) {
        ([m, k], [k2, n]) => (1, *m, *k, *k2, *n),
        ([ba, m, k], [bb, k2, n]) => {
            if ba != bb {
                return Err(NapcasError::ShapeMismatch {
                    expected: vec![*ba, *k, *n],
                    actual: b_shape.to_vec(),
                    operation: "matmul (batch dim)".to_string(),
                });
            }
            (*ba, *m, *k, *k2, *n)
        }
        _ => {
            return Err(NapcasError::ShapeMismatch {
                expected: a_shape.to_vec(),
                actual: b_shape.to_vec(),
                operation: "matmul (operands must both be 2-D or both 3-D)".to_string(),
            })
        }
    };
    if k != k2 {
        return Err(NapcasError::ShapeMismatch {
            expected: vec![k, n],
            actual: b_shape.to_vec(),
            operation: "matmul (inner dim)".to_string(),
        });
    }
    Ok((batch, m, k, n))
}

// --- Forward Operation ---

/// Matrix product of `[m, k] x [k, n]`, or batched `[b, m, k] x [b, k, n]`.
///
/// # Errors
/// Returns `NapcasError::ShapeMismatch` if the inner dimensions, the batch
/// dimensions or the ranks disagree.
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, NapcasError> {
    let (a_data, a_shape) = a.snapshot();
    let (b_data, b_shape) = b.snapshot();
    let (batch, m, k, n) = matmul_dims(&a_shape, &b_shape)?;
    let mut data = Vec::with_capacity(batch * m * n);
    for i in 0..batch {
        data.extend(matmul_kernel(
            &a_data[i * m * k..(i + 1) * m * k],
            &b_data[i * k * n..(i + 1) * k * n],
            m,
            k,
            n,
        ));
    }
    let shape = if a_shape.len() == 3 {
        vec![batch, m, n]
    } else {
        vec![m, n]
    };
    Ok(track(data, shape, &[a, b], || Op::MatMul))
}

// --- Backward Operation ---

/// dL/dA = G x B^T and dL/dB = A^T x G, per batch.
pub(crate) fn matmul_backward(ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
    let a_shape = ctx.input_shape(0);
    let b_shape = ctx.input_shape(1);
    let (batch, m, k, n) = matmul_dims(&a_shape, &b_shape)?;
    let a = ctx.input_data(0);
    let b = ctx.input_data(1);
    let grad = ctx.grad_output;

    let mut grad_a = ctx.needs(0).then(|| Vec::with_capacity(batch * m * k));
    let mut grad_b = ctx.needs(1).then(|| Vec::with_capacity(batch * k * n));
    for i in 0..batch {
        let g = &grad[i * m * n..(i + 1) * m * n];
        if let Some(ga) = grad_a.as_mut() {
            let b_t = transpose_2d(&b[i * k * n..(i + 1) * k * n], k, n);
            ga.extend(matmul_kernel(g, &b_t, m, n, k));
        }
        if let Some(gb) = grad_b.as_mut() {
            let a_t = transpose_2d(&a[i * m * k..(i + 1) * m * k], m, k);
            gb.extend(matmul_kernel(&a_t, g, k, m, n));
        }
    }
    Ok(vec![grad_a, grad_b])
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
