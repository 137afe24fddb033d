use crate::error::NapcasError;
use crate::ops::activation::{relu, sigmoid, softmax, tanh};
use crate::ops::arithmetic::{add, div, mul, neg, scalar, sub};
use crate::ops::conv::{conv2d, max_pool2d};
use crate::ops::linalg::matmul;
use crate::ops::loss::cross_entropy;
use crate::ops::math_elem::{exp, ln, pow};
use crate::ops::reduction::{mean, sum};
use crate::ops::view::{concat, narrow, permute, reshape};
use crate::tensor::Tensor;
use std::sync::Arc;

/// Gradients returned by a backward rule, one slot per input in forward order.
///
/// A slot is `None` when the input does not require a gradient.
pub(crate) type InputGrads = Vec<Option<Vec<f32>>>;

/// Everything a backward rule may read when it is replayed.
pub(crate) struct BackwardContext<'a> {
    /// dL/dOutput, laid out in the output's shape.
    pub(crate) grad_output: &'a [f32],
    pub(crate) output_shape: &'a [usize],
    pub(crate) inputs: &'a [Tensor],
    /// Input values captured when the node was recorded, see [`Op::saves_input`].
    pub(crate) saved: &'a [Option<Arc<Vec<f32>>>],
    /// Which inputs need a gradient.
    pub(crate) needs_grad: &'a [bool],
}

impl BackwardContext<'_> {
    /// Forward-time values of input `index`.
    ///
    /// Inputs may be modified in place (optimizer steps, `copy_from`) between
    /// the forward and the backward pass; the recorded copy is unaffected.
    pub(crate) fn input_data(&self, index: usize) -> Vec<f32> {
        match self.saved.get(index).and_then(Option::as_ref) {
            Some(values) => values.to_vec(),
            None => self.inputs[index].get_f32_data(),
        }
    }

    pub(crate) fn input_shape(&self, index: usize) -> Vec<usize> {
        self.inputs[index].shape()
    }

    pub(crate) fn needs(&self, index: usize) -> bool {
        self.needs_grad.get(index).copied().unwrap_or(false)
    }
}

/// Operation kind recorded in a graph node.
///
/// The set of differentiable operations is closed, so backward rules are
/// dispatched with a `match` rather than through trait objects. Variants carry
/// only what their rule needs beyond the node inputs (saved outputs, axes).
#[derive(Debug, Clone)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    AddScalar,
    MulScalar { factor: f32 },
    PowScalar { exponent: f32 },
    Exp { output: Arc<Vec<f32>> },
    Ln,
    MatMul,
    Reshape,
    Permute { dims: Vec<usize> },
    Narrow { dim: usize, start: usize },
    Concat { dim: usize },
    Sum,
    SumAxis { axis: usize },
    Mean,
    MeanAxis { axis: usize },
    Relu,
    Sigmoid { output: Arc<Vec<f32>> },
    Tanh { output: Arc<Vec<f32>> },
    Softmax { axis: usize, output: Arc<Vec<f32>> },
    Conv2d { stride: usize, padding: usize },
    MaxPool2d { argmax: Arc<Vec<usize>> },
    CrossEntropy { log_probs: Arc<Vec<f32>> },
    // Recorded for graph bookkeeping only; no gradient exists.
    Argmax { axis: usize },
    Round,
}

impl Op {
    /// Name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Neg => "neg",
            Op::AddScalar => "add_scalar",
            Op::MulScalar { .. } => "mul_scalar",
            Op::PowScalar { .. } => "pow_scalar",
            Op::Exp { .. } => "exp",
            Op::Ln => "ln",
            Op::MatMul => "matmul",
            Op::Reshape => "reshape",
            Op::Permute { .. } => "permute",
            Op::Narrow { .. } => "narrow",
            Op::Concat { .. } => "concat",
            Op::Sum => "sum",
            Op::SumAxis { .. } => "sum_axis",
            Op::Mean => "mean",
            Op::MeanAxis { .. } => "mean_axis",
            Op::Relu => "relu",
            Op::Sigmoid { .. } => "sigmoid",
            Op::Tanh { .. } => "tanh",
            Op::Softmax { .. } => "softmax",
            Op::Conv2d { .. } => "conv2d",
            Op::MaxPool2d { .. } => "max_pool2d",
            Op::CrossEntropy { .. } => "cross_entropy",
            Op::Argmax { .. } => "argmax",
            Op::Round => "round",
        }
    }

    /// Whether the backward rule reads the values of input `index`, which
    /// must then be copied when the node is recorded.
    pub(crate) fn saves_input(&self, index: usize) -> bool {
        match self {
            Op::Mul | Op::Div | Op::MatMul | Op::Ln | Op::PowScalar { .. } | Op::Relu => true,
            // Weight and input; the bias gradient only needs dL/dOutput.
            Op::Conv2d { .. } => index < 2,
            // Only the target; the logits are represented by the saved log-probabilities.
            Op::CrossEntropy { .. } => index == 1,
            _ => false,
        }
    }

    /// Computes dL/dInput for every input of the node from dL/dOutput.
    ///
    /// # Errors
    /// Returns `NapcasError::UnsupportedGradient` for operations without a
    /// gradient. Such operations abort the backward pass instead of silently
    /// contributing zeros.
    pub(crate) fn backward(&self, ctx: &BackwardContext) -> Result<InputGrads, NapcasError> {
        match self {
            Op::Add => add::add_backward(ctx),
            Op::Sub => sub::sub_backward(ctx),
            Op::Mul => mul::mul_backward(ctx),
            Op::Div => div::div_backward(ctx),
            Op::Neg => neg::neg_backward(ctx),
            Op::AddScalar => scalar::add_scalar_backward(ctx),
            Op::MulScalar { factor } => scalar::mul_scalar_backward(ctx, *factor),
            Op::PowScalar { exponent } => pow::pow_scalar_backward(ctx, *exponent),
            Op::Exp { output } => exp::exp_backward(ctx, output),
            Op::Ln => ln::ln_backward(ctx),
            Op::MatMul => matmul::matmul_backward(ctx),
            Op::Reshape => reshape::reshape_backward(ctx),
            Op::Permute { dims } => permute::permute_backward(ctx, dims),
            Op::Narrow { dim, start } => narrow::narrow_backward(ctx, *dim, *start),
            Op::Concat { dim } => concat::concat_backward(ctx, *dim),
            Op::Sum => sum::sum_backward(ctx),
            Op::SumAxis { axis } => sum::sum_axis_backward(ctx, *axis),
            Op::Mean => mean::mean_backward(ctx),
            Op::MeanAxis { axis } => mean::mean_axis_backward(ctx, *axis),
            Op::Relu => relu::relu_backward(ctx),
            Op::Sigmoid { output } => sigmoid::sigmoid_backward(ctx, output),
            Op::Tanh { output } => tanh::tanh_backward(ctx, output),
            Op::Softmax { axis, output } => softmax::softmax_backward(ctx, *axis, output),
            Op::Conv2d { stride, padding } => conv2d::conv2d_backward(ctx, *stride, *padding),
            Op::MaxPool2d { argmax } => max_pool2d::max_pool2d_backward(ctx, argmax),
            Op::CrossEntropy { log_probs } => cross_entropy::cross_entropy_backward(ctx, log_probs),
            Op::Argmax { .. } | Op::Round => Err(NapcasError::UnsupportedGradient {
                op: self.name().to_string(),
                reason: "operation is not differentiable".to_string(),
            }),
        }
    }
}
