use crate::error::NapcasError;
use crate::nn::layers::activation::Activation;
use crate::nn::layers::linear::Linear;
use crate::nn::module::{children_parameters, Module};
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::Rng;

/// Chains modules, feeding each one's output to the next.
///
/// Children are named by their position (`"0"`, `"1"`, ...), so parameter
/// names read `"0.weight"`, `"2.bias"` and so on.
#[derive(Debug, Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Module>>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential { layers: Vec::new() }
    }

    /// Builder form of [`Sequential::push`].
    pub fn add<M: Module + 'static>(mut self, module: M) -> Self {
        self.layers.push(Box::new(module));
        self
    }

    pub fn push(&mut self, module: Box<dyn Module>) {
        self.layers.push(module);
    }

    /// Multi-layer perceptron: a `Linear` between each pair of consecutive
    /// `sizes`, with `activation` between (not after) the linear layers.
    ///
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if fewer than two sizes are given.
    pub fn mlp<R: Rng + ?Sized>(
        sizes: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        if sizes.len() < 2 {
            return Err(NapcasError::ConfigurationError(format!(
                "an MLP needs at least an input and an output size, got {:?}",
                sizes
            )));
        }
        let mut model = Sequential::new();
        for (i, pair) in sizes.windows(2).enumerate() {
            model.push(Box::new(Linear::new(pair[0], pair[1], true, rng)?));
            if i + 2 < sizes.len() {
                model.push(activation.module());
            }
        }
        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        let mut x = input.clone();
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
            .map(|(i, layer)| (i.to_string(), layer.as_ref()))
            .collect()
    }
}

#[cfg(test)]
#[path = "sequential_test.rs"]
mod tests;
