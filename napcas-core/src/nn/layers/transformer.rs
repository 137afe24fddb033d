use crate::error::NapcasError;
use crate::nn::layers::attention::MultiHeadAttention;
use crate::nn::layers::linear::Linear;
use crate::nn::module::{children_parameters, Module};
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hyperparameters of a [`Transformer`] encoder stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    pub d_model: usize,
    pub num_heads: usize,
    pub num_layers: usize,
    /// Hidden width of the feed-forward block.
    pub d_ff: usize,
    /// Longest sequence the positional encoding table covers.
    pub max_len: usize,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        TransformerConfig {
            d_model: 64,
            num_heads: 4,
            num_layers: 2,
            d_ff: 256,
            max_len: 512,
        }
    }
}

impl TransformerConfig {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if a size is zero or
    /// `d_model` is not a multiple of `num_heads`.
    pub fn validate(&self) -> Result<(), NapcasError> {
        if self.d_model == 0
            || self.num_heads == 0
            || self.num_layers == 0
            || self.d_ff == 0
            || self.max_len == 0
        {
            return Err(NapcasError::ConfigurationError(format!(
                "transformer sizes must be positive: {:?}",
                self
            )));
        }
        if self.d_model % self.num_heads != 0 {
            return Err(NapcasError::ConfigurationError(format!(
                "d_model ({}) must be divisible by num_heads ({})",
                self.d_model, self.num_heads
            )));
        }
        Ok(())
    }
}

/// Sinusoidal table `[max_len, 1, d_model]`.
///
/// Position `pos` and feature `j` get `sin(pos / 10000^(2j / d_model))` for
/// even `j` and `cos` of the same angle for odd `j`.
pub fn positional_encoding(max_len: usize, d_model: usize) -> Result<Tensor, NapcasError> {
    let mut table = Vec::with_capacity(max_len * d_model);
    for pos in 0..max_len {
        for j in 0..d_model {
            let div_term = 10000f32.powf(2.0 * j as f32 / d_model as f32);
            let angle = pos as f32 / div_term;
            table.push(if j % 2 == 0 { angle.sin() } else { angle.cos() });
        }
    }
    Tensor::new(table, vec![max_len, 1, d_model])
}

#[derive(Debug)]
struct EncoderLayer {
    attention: MultiHeadAttention,
    ff1: Linear,
    ff2: Linear,
}

impl Module for EncoderLayer {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        let x = input.add(&self.attention.forward(input)?)?;
        let ff = self.ff2.forward(&self.ff1.forward(&x)?.relu()?)?;
        x.add(&ff)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        children_parameters(self)
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("attention".to_string(), &self.attention as &dyn Module),
            ("ff1".to_string(), &self.ff1),
            ("ff2".to_string(), &self.ff2),
        ]
    }
}

/// Encoder-only transformer over `[seq_len, batch, d_model]`.
///
/// Adds a fixed positional encoding to the input, then runs `num_layers`
/// blocks of residual self-attention followed by a residual
/// `Linear -> ReLU -> Linear` feed-forward network.
#[derive(Debug)]
pub struct Transformer {
    layers: Vec<EncoderLayer>,
    positional: Tensor,
    config: TransformerConfig,
}

impl Transformer {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if the config is invalid.
    pub fn new<R: Rng + ?Sized>(config: TransformerConfig, rng: &mut R) -> Result<Self, NapcasError> {
        config.validate()?;
        let layers = (0..config.num_layers)
            .map(|_| {
                Ok(EncoderLayer {
                    attention: MultiHeadAttention::new(config.d_model, config.num_heads, rng)?,
                    ff1: Linear::new(config.d_model, config.d_ff, true, rng)?,
                    ff2: Linear::new(config.d_ff, config.d_model, true, rng)?,
                })
            })
            .collect::<Result<Vec<_>, NapcasError>>()?;
        debug!(
            "Transformer: {} layers, d_model={}, heads={}, d_ff={}",
            config.num_layers, config.d_model, config.num_heads, config.d_ff
        );
        Ok(Transformer {
            layers,
            positional: positional_encoding(config.max_len, config.d_model)?,
            config,
        })
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }
}

impl Module for Transformer {
    /// # Errors
    /// `NapcasError::ShapeMismatch` if the input is not `[seq_len, batch, d_model]`
    /// with `seq_len <= max_len`.
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        let seq_len = match input.shape().as_slice() {
            [s, _, d] if *d == self.config.d_model && *s <= self.config.max_len => *s,
            other => {
                return Err(NapcasError::ShapeMismatch {
                    expected: vec![self.config.max_len, 0, self.config.d_model],
                    actual: other.to_vec(),
                    operation: "transformer (input must be [seq_len <= max_len, batch, d_model])"
                        .to_string(),
                })
            }
        };
        let mut x = input.add(&self.positional.narrow(0, 0, seq_len)?)?;
        for layer in &self.layers {
            x = layer.forward(&x)?;
        }
        Ok(x)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        children_parameters(self)
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (format!("layers.{}", i), layer as &dyn Module))
            .collect()
    }
}

#[cfg(test)]
#[path = "transformer_test.rs"]
mod tests;
