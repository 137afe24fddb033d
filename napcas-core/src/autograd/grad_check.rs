//! Finite-difference verification of analytic gradients.

use crate::autograd::graph::no_grad;
use crate::error::NapcasError;
use crate::tensor::Tensor;
use approx::relative_eq;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad} != numerical {numerical_grad}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
    },

    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(NapcasError),

    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(NapcasError),

    #[error("Input {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },

    #[error("Gradient check input {input_index} must be a leaf tensor.")]
    InputNotLeaf { input_index: usize },

    #[error("Output shape {output:?} does not match output_grad shape {output_grad:?}")]
    OutputGradShape {
        output: Vec<usize>,
        output_grad: Vec<usize>,
    },

    #[error("Non-finite gradient for input {input_index}, element {element_index}")]
    NonFinite {
        input_index: usize,
        element_index: usize,
    },

    #[error("Tensor error during gradient check: {0}")]
    TensorError(NapcasError),
}

impl From<NapcasError> for GradCheckError {
    fn from(err: NapcasError) -> Self {
        GradCheckError::TensorError(err)
    }
}

// sum(output * output_grad), accumulated in f64.
fn weighted_sum(output: &Tensor, output_grad: &[f32]) -> f64 {
    output
        .get_f32_data()
        .iter()
        .zip(output_grad)
        .map(|(&o, &g)| o as f64 * g as f64)
        .sum()
}

/// Checks analytical gradients against central finite differences.
///
/// The scalar being differentiated is `sum(func(inputs) * output_grad)`.
/// Only inputs with `requires_grad` are checked; they must be leaves.
///
/// # Arguments
/// * `func`: the computation under test.
/// * `inputs`: leaf tensors passed to `func`.
/// * `output_grad`: weights applied to the output, same shape as `func`'s result.
/// * `epsilon`: perturbation size.
/// * `tolerance`: absolute and relative tolerance of the comparison.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f32,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, NapcasError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        input.clear_grad();
    }

    // --- Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::OutputGradShape {
            output: output.shape(),
            output_grad: output_grad.shape(),
        });
    }
    let weights = output_grad.get_f32_data();
    let loss = output.mul(output_grad)?.sum()?;
    loss.backward().map_err(GradCheckError::BackwardPassError)?;
    drop(loss);
    drop(output);

    // --- Numerical gradients ---
    let _guard = no_grad();
    for (i, input) in inputs.iter().enumerate() {
        if !input.requires_grad() {
            continue;
        }
        let analytical = input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .get_f32_data();
        let original = input.get_f32_data();
        let shape = input.shape();

        for elem in 0..original.len() {
            let evaluate = |delta: f32| -> Result<(f64, f32), GradCheckError> {
                let mut data = original.clone();
                data[elem] += delta;
                let actual = data[elem];
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[i] = Tensor::new(data, shape.clone())?;
                let out = func(&perturbed_inputs).map_err(GradCheckError::ForwardPassError)?;
                Ok((weighted_sum(&out, &weights), actual))
            };
            let (loss_plus, x_plus) = evaluate(epsilon)?;
            let (loss_minus, x_minus) = evaluate(-epsilon)?;
            // Divide by the step that was actually representable in f32.
            let numerical = (loss_plus - loss_minus) / (x_plus as f64 - x_minus as f64);
            let analytical_value = analytical[elem] as f64;

            if !numerical.is_finite() || !analytical_value.is_finite() {
                return Err(GradCheckError::NonFinite {
                    input_index: i,
                    element_index: elem,
                });
            }
            if !relative_eq!(
                analytical_value,
                numerical,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem,
                    analytical_grad: analytical_value,
                    numerical_grad: numerical,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
