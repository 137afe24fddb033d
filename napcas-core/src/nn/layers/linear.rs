use crate::error::NapcasError;
use crate::nn::init::{kaiming_uniform_, uniform_};
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::Rng;

/// `input x weight^T + bias` over the last axis of `input`.
///
/// Leading axes are flattened into one batch axis for the product and
/// restored afterwards; a 1-D input is treated as a single sample.
pub(crate) fn linear_forward(
    input: &Tensor,
    weight: &Tensor,
    bias: Option<&Tensor>,
) -> Result<Tensor, NapcasError> {
    let shape = input.shape();
    let weight_shape = weight.shape();
    let (out_features, in_features) = (weight_shape[0], weight_shape[1]);
    if shape.last() != Some(&in_features) {
        return Err(NapcasError::ShapeMismatch {
            expected: vec![in_features],
            actual: shape,
            operation: "linear (last dim)".to_string(),
        });
    }
    let rows = input.numel() / in_features;
    let flat = if shape.len() == 2 {
        input.clone()
    } else {
        input.reshape(&[rows, in_features])?
    };
    let mut output = flat.matmul(&weight.transpose(0, 1)?)?;
    if let Some(b) = bias {
        output = output.add(b)?;
    }
    if shape.len() == 2 {
        return Ok(output);
    }
    let mut out_shape = shape;
    if let Some(last) = out_shape.last_mut() {
        *last = out_features;
    }
    output.reshape(&out_shape)
}

/// Applies a linear transformation to the incoming data: `y = x A^T + b`.
///
/// The input may have any rank; the transformation applies over its last
/// axis, which must have `in_features` elements.
#[derive(Debug)]
pub struct Linear {
    weight: Parameter,
    bias: Option<Parameter>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Creates a new Linear layer.
    ///
    /// Weights are drawn from `U(-1/sqrt(in), 1/sqrt(in))` (Kaiming uniform
    /// with `a = sqrt(5)`) and so is the bias.
    ///
    /// # Errors
    /// Returns `NapcasError::ShapeError` if a feature count is zero.
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        has_bias: bool,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        let weight = Tensor::zeros(&[out_features, in_features])?;
        kaiming_uniform_(&weight, 5.0f32.sqrt(), rng)?;
        let bias = if has_bias {
            let bias = Tensor::zeros(&[out_features])?;
            let bound = 1.0 / (in_features as f32).sqrt();
            uniform_(&bias, -bound, bound, rng)?;
            Some(Parameter::new(bias))
        } else {
            None
        };
        Ok(Linear {
            weight: Parameter::new(weight),
            bias,
            in_features,
            out_features,
        })
    }

    /// Builds a layer around existing tensors: `weight [out, in]`, `bias [out]`.
    ///
    /// # Errors
    /// Returns `NapcasError::ShapeMismatch` if the shapes do not fit together.
    pub fn from_weights(weight: Tensor, bias: Option<Tensor>) -> Result<Self, NapcasError> {
        let shape = weight.shape();
        let (out_features, in_features) = match shape.as_slice() {
            [out_features, in_features] => (*out_features, *in_features),
            _ => {
                return Err(NapcasError::ShapeMismatch {
                    expected: vec![0, 0],
                    actual: shape.clone(),
                    operation: "Linear::from_weights (weight must be 2-D)".to_string(),
                })
            }
        };
        if let Some(b) = &bias {
            if b.shape() != [out_features] {
                return Err(NapcasError::ShapeMismatch {
                    expected: vec![out_features],
                    actual: b.shape(),
                    operation: "Linear::from_weights (bias)".to_string(),
                });
            }
        }
        Ok(Linear {
            weight: Parameter::new(weight),
            bias: bias.map(Parameter::new),
            in_features,
            out_features,
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        linear_forward(input, &self.weight, self.bias.as_deref())
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        let mut params = vec![("weight".to_string(), self.weight.clone())];
        if let Some(b) = &self.bias {
            params.push(("bias".to_string(), b.clone()));
        }
        params
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
