use crate::error::NapcasError;
use crate::nn::init::{calculate_fan_in_and_fan_out, kaiming_uniform_, uniform_};
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hyperparameters of a [`Conv2d`] layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conv2dConfig {
    pub stride: usize,
    /// Zero padding added on every side.
    pub padding: usize,
    pub bias: bool,
}

impl Default for Conv2dConfig {
    fn default() -> Self {
        Conv2dConfig {
            stride: 1,
            padding: 0,
            bias: true,
        }
    }
}

impl Conv2dConfig {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if `stride` is zero.
    pub fn validate(&self) -> Result<(), NapcasError> {
        if self.stride == 0 {
            return Err(NapcasError::ConfigurationError(
                "Conv2d stride must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// 2-D convolution over `[N, C, H, W]` inputs with square kernels.
#[derive(Debug)]
pub struct Conv2d {
    weight: Parameter,
    bias: Option<Parameter>,
    config: Conv2dConfig,
}

impl Conv2d {
    /// Creates a layer with a `[out_channels, in_channels, kernel, kernel]` weight.
    ///
    /// # Errors
    /// * `NapcasError::ConfigurationError` if the config is invalid.
    /// * `NapcasError::ShapeError` if a size is zero.
    pub fn new<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        config: Conv2dConfig,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        config.validate()?;
        let weight = Tensor::zeros(&[out_channels, in_channels, kernel_size, kernel_size])?;
        kaiming_uniform_(&weight, 5.0f32.sqrt(), rng)?;
        let bias = if config.bias {
            let (fan_in, _) = calculate_fan_in_and_fan_out(&weight.shape())?;
            let bias = Tensor::zeros(&[out_channels])?;
            let bound = 1.0 / (fan_in as f32).sqrt();
            uniform_(&bias, -bound, bound, rng)?;
            Some(Parameter::new(bias))
        } else {
            None
        };
        Ok(Conv2d {
            weight: Parameter::new(weight),
            bias,
            config,
        })
    }

    pub fn weight(&self) -> &Parameter {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Parameter> {
        self.bias.as_ref()
    }

    pub fn config(&self) -> &Conv2dConfig {
        &self.config
    }
}

impl Module for Conv2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.conv2d(
            &self.weight,
            self.bias.as_deref(),
            self.config.stride,
            self.config.padding,
        )
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
#[path = "conv_test.rs"]
mod tests;
