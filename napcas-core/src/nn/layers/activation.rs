use crate::error::NapcasError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Applies the rectified linear unit function element-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

/// Applies the logistic sigmoid element-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

/// Applies the hyperbolic tangent element-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

/// Applies softmax along `axis`.
#[derive(Debug, Clone, Copy)]
pub struct Softmax {
    pub axis: usize,
}

impl Softmax {
    pub fn new(axis: usize) -> Self {
        Softmax { axis }
    }
}

impl Module for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.relu()
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }
}

impl Module for Sigmoid {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.sigmoid()
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }
}

impl Module for Tanh {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.tanh()
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }
}

impl Module for Softmax {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        input.softmax(self.axis)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }
}

/// Element-wise activation selector used by model builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    ReLU,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        match self {
            Activation::ReLU => input.relu(),
            Activation::Sigmoid => input.sigmoid(),
            Activation::Tanh => input.tanh(),
        }
    }

    /// Boxed module form, for [`Sequential`](crate::nn::Sequential).
    pub fn module(&self) -> Box<dyn Module> {
        match self {
            Activation::ReLU => Box::new(ReLU),
            Activation::Sigmoid => Box::new(Sigmoid),
            Activation::Tanh => Box::new(Tanh),
        }
    }
}
