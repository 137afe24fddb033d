use crate::autograd::backward_op::{BackwardContext, InputGrads, Op};
use crate::error::NapcasError;
use crate::ops::conv::{nchw, output_extent};
use crate::ops::linalg::matmul::{matmul_kernel, transpose_2d};
use crate::ops::track;
use crate::tensor::Tensor;

/// Sizes shared by the forward and backward passes.
#[derive(Debug, Clone, Copy)]
struct ConvGeometry {
    batch: usize,
    in_channels: usize,
    height: usize,
    width: usize,
    out_channels: usize,
    kernel_h: usize,
    kernel_w: usize,
    out_h: usize,
    out_w: usize,
    stride: usize,
    padding: usize,
}

impl ConvGeometry {
    fn new(
        input_shape: &[usize],
        weight_shape: &[usize],
        stride: usize,
        padding: usize,
    ) -> Result<Self, NapcasError> {
        if stride == 0 {
            return Err(NapcasError::ConfigurationError(
                "conv2d stride must be positive".to_string(),
            ));
        }
        let [batch, in_channels, height, width] = nchw(input_shape, "conv2d")?;
        let [out_channels, weight_channels, kernel_h, kernel_w] = nchw(weight_shape, "conv2d weight")?;
        if weight_channels != in_channels {
            return Err(NapcasError::ShapeMismatch {
                expected: vec![out_channels, in_channels, kernel_h, kernel_w],
                actual: weight_shape.to_vec(),
                operation: "conv2d (channel dim)".to_string(),
            });
        }
        let extents = (
            output_extent(height, kernel_h, stride, padding),
            output_extent(width, kernel_w, stride, padding),
        );
        let (Some(out_h), Some(out_w)) = extents else {
            return Err(NapcasError::ShapeMismatch {
                expected: vec![kernel_h, kernel_w],
                actual: input_shape.to_vec(),
                operation: "conv2d (kernel larger than padded input)".to_string(),
            });
        };
        Ok(ConvGeometry {
            batch,
            in_channels,
            height,
            width,
            out_channels,
            kernel_h,
            kernel_w,
            out_h,
            out_w,
            stride,
            padding,
        })
    }

    fn patch_len(&self) -> usize {
        self.in_channels * self.kernel_h * self.kernel_w
    }

    fn positions(&self) -> usize {
        self.out_h * self.out_w
    }

    fn sample_len(&self) -> usize {
        self.in_channels * self.height * self.width
    }

    /// Input coordinate read by kernel tap `(ki, kj)` at output `(oi, oj)`,
    /// or `None` inside the zero padding.
    fn source(&self, oi: usize, oj: usize, ki: usize, kj: usize) -> Option<(usize, usize)> {
        let row = (oi * self.stride + ki).checked_sub(self.padding)?;
        let col = (oj * self.stride + kj).checked_sub(self.padding)?;
        (row < self.height && col < self.width).then_some((row, col))
    }

    /// Lowers one sample `[C, H, W]` to columns `[C*KH*KW, OH*OW]`.
    fn im2col(&self, sample: &[f32]) -> Vec<f32> {
        let positions = self.positions();
        let mut cols = vec![0.0f32; self.patch_len() * positions];
        for c in 0..self.in_channels {
            for ki in 0..self.kernel_h {
                for kj in 0..self.kernel_w {
                    let row = (c * self.kernel_h + ki) * self.kernel_w + kj;
                    for oi in 0..self.out_h {
                        for oj in 0..self.out_w {
                            if let Some((h, w)) = self.source(oi, oj, ki, kj) {
                                cols[row * positions + oi * self.out_w + oj] =
                                    sample[(c * self.height + h) * self.width + w];
                            }
                        }
                    }
                }
            }
        }
        cols
    }

    /// Scatters column gradients back onto one sample, summing overlaps.
    fn col2im(&self, cols: &[f32]) -> Vec<f32> {
        let positions = self.positions();
        let mut sample = vec![0.0f32; self.sample_len()];
        for c in 0..self.in_channels {
            for ki in 0..self.kernel_h {
                for kj in 0..self.kernel_w {
                    let row = (c * self.kernel_h + ki) * self.kernel_w + kj;
                    for oi in 0..self.out_h {
                        for oj in 0..self.out_w {
                            if let Some((h, w)) = self.source(oi, oj, ki, kj) {
                                sample[(c * self.height + h) * self.width + w] +=
                                    cols[row * positions + oi * self.out_w + oj];
                            }
                        }
                    }
                }
            }
        }
        sample
    }
}

// --- Forward Operation ---

/// 2-D cross-correlation of `input [N, C, H, W]` with `weight [O, C, KH, KW]`,
/// plus an optional per-channel `bias [O]`.
///
/// The output is `[N, O, OH, OW]` with `OH = (H + 2*padding - KH) / stride + 1`
/// (same for the width). Padding is zero-filled.
///
/// # Errors
/// * `NapcasError::ConfigurationError` if `stride` is zero.
/// * `NapcasError::ShapeMismatch` for wrong ranks, disagreeing channel counts,
///   a bias that is not `[O]` or a kernel larger than the padded input.
pub fn conv2d_op(
    input: &Tensor,
    weight: &Tensor,
    bias: Option<&Tensor>,
    stride: usize,
    padding: usize,
) -> Result<Tensor, NapcasError> {
    let (x, x_shape) = input.snapshot();
    let (w, w_shape) = weight.snapshot();
    let geo = ConvGeometry::new(&x_shape, &w_shape, stride, padding)?;
    let bias_data = match bias {
        Some(b) => {
            let (data, shape) = b.snapshot();
            if shape != [geo.out_channels] {
                return Err(NapcasError::ShapeMismatch {
                    expected: vec![geo.out_channels],
                    actual: shape,
                    operation: "conv2d (bias)".to_string(),
                });
            }
            Some(data)
        }
        None => None,
    };

    let positions = geo.positions();
    let mut data = Vec::with_capacity(geo.batch * geo.out_channels * positions);
    for n in 0..geo.batch {
        let cols = geo.im2col(&x[n * geo.sample_len()..(n + 1) * geo.sample_len()]);
        let mut out = matmul_kernel(&w, &cols, geo.out_channels, geo.patch_len(), positions);
        if let Some(b) = bias_data.as_ref() {
            for (o, row) in out.chunks_mut(positions).enumerate() {
                row.iter_mut().for_each(|v| *v += b[o]);
            }
        }
        data.extend(out);
    }

    let shape = vec![geo.batch, geo.out_channels, geo.out_h, geo.out_w];
    let op = || Op::Conv2d { stride, padding };
    Ok(match bias {
        Some(b) => track(data, shape, &[input, weight, b], op),
        None => track(data, shape, &[input, weight], op),
    })
}

// --- Backward Operation ---

/// Per sample: dW += G x cols^T, dcols = W^T x G scattered by col2im, and
/// db sums G over the spatial positions.
pub(crate) fn conv2d_backward(
    ctx: &BackwardContext,
    stride: usize,
    padding: usize,
) -> Result<InputGrads, NapcasError> {
    let geo = ConvGeometry::new(&ctx.input_shape(0), &ctx.input_shape(1), stride, padding)?;
    let x = ctx.input_data(0);
    let w = ctx.input_data(1);
    let positions = geo.positions();
    let out_len = geo.out_channels * positions;
    let has_bias = ctx.inputs.len() == 3;

    let mut grad_x = ctx.needs(0).then(|| Vec::with_capacity(x.len()));
    let mut grad_w = ctx.needs(1).then(|| vec![0.0f32; w.len()]);
    let mut grad_b = (has_bias && ctx.needs(2)).then(|| vec![0.0f32; geo.out_channels]);
    let w_t = grad_x
        .is_some()
        .then(|| transpose_2d(&w, geo.out_channels, geo.patch_len()));

    for n in 0..geo.batch {
        let g = &ctx.grad_output[n * out_len..(n + 1) * out_len];
        if let Some(gw) = grad_w.as_mut() {
            let cols = geo.im2col(&x[n * geo.sample_len()..(n + 1) * geo.sample_len()]);
            let cols_t = transpose_2d(&cols, geo.patch_len(), positions);
            let local = matmul_kernel(g, &cols_t, geo.out_channels, positions, geo.patch_len());
            gw.iter_mut().zip(local).for_each(|(acc, v)| *acc += v);
        }
        if let (Some(gx), Some(w_t)) = (grad_x.as_mut(), w_t.as_ref()) {
            let dcols = matmul_kernel(w_t, g, geo.patch_len(), geo.out_channels, positions);
            gx.extend(geo.col2im(&dcols));
        }
        if let Some(gb) = grad_b.as_mut() {
            for (acc, row) in gb.iter_mut().zip(g.chunks(positions)) {
                *acc += row.iter().sum::<f32>();
            }
        }
    }

    let mut grads = vec![grad_x, grad_w];
    if has_bias {
        grads.push(grad_b);
    }
    Ok(grads)
}

#[cfg(test)]
#[path = "conv2d_test.rs"]
mod tests;
