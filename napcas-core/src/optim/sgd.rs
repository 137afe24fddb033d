use crate::autograd::no_grad;
use crate::error::NapcasError;
use crate::nn::{Module, Parameter};
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_buffer, check_registration, find_param, Optimizer};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hyperparameters of [`Sgd`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    pub lr: f32,
    pub momentum: f32,
    /// L2 penalty added to the gradient.
    pub weight_decay: f32,
    pub nesterov: bool,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            lr: 0.01,
            momentum: 0.0,
            weight_decay: 0.0,
            nesterov: false,
        }
    }
}

impl SgdConfig {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` for a negative or non-finite
    /// value, or Nesterov without momentum.
    pub fn validate(&self) -> Result<(), NapcasError> {
        for (name, value) in [
            ("lr", self.lr),
            ("momentum", self.momentum),
            ("weight_decay", self.weight_decay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NapcasError::ConfigurationError(format!(
                    "SGD {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.nesterov && self.momentum == 0.0 {
            return Err(NapcasError::ConfigurationError(
                "Nesterov momentum requires a positive momentum".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct SgdSlot {
    name: String,
    param: Parameter,
    velocity: Option<Vec<f32>>,
}

/// Stochastic gradient descent with optional momentum, weight decay and
/// Nesterov momentum.
///
/// With momentum `mu`, `v = mu * v + g` (`v = g` on the first step) and the
/// update uses `v`, or `g + mu * v` under Nesterov.
#[derive(Debug)]
pub struct Sgd {
    slots: Vec<SgdSlot>,
    config: SgdConfig,
}

impl Sgd {
    /// # Errors
    /// * `NapcasError::ConfigurationError` if the config is invalid.
    /// * `NapcasError::OptimizerState` if a name or parameter appears twice.
    pub fn new(params: Vec<(String, Parameter)>, config: SgdConfig) -> Result<Self, NapcasError> {
        config.validate()?;
        check_registration(&params)?;
        debug!("SGD over {} parameters: {:?}", params.len(), config);
        Ok(Sgd {
            slots: params
                .into_iter()
                .map(|(name, param)| SgdSlot {
                    name,
                    param,
                    velocity: None,
                })
                .collect(),
            config,
        })
    }

    /// Optimizer over all parameters of `module`.
    pub fn for_module(module: &dyn Module, config: SgdConfig) -> Result<Self, NapcasError> {
        Sgd::new(module.named_parameters(), config)
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    fn update(&mut self, index: usize) -> Result<(), NapcasError> {
        let SgdConfig {
            lr,
            momentum,
            weight_decay,
            nesterov,
        } = self.config;
        let slot = &mut self.slots[index];
        let grad = match slot.param.grad() {
            Some(g) => g.get_f32_data(),
            None => return Ok(()),
        };
        let _guard = no_grad();
        let velocity = &mut slot.velocity;
        slot.param.with_data_mut(|data| {
            let mut g: Vec<f32> = grad
                .iter()
                .zip(data.iter())
                .map(|(g, p)| g + weight_decay * p)
                .collect();
            if momentum != 0.0 {
                if let Some(v) = velocity.as_mut() {
                    v.iter_mut().zip(&g).for_each(|(v, g)| *v = momentum * *v + g);
                } else {
                    *velocity = Some(g.clone());
                }
                if let Some(v) = velocity.as_ref() {
                    if nesterov {
                        g.iter_mut().zip(v).for_each(|(g, v)| *g += momentum * v);
                    } else {
                        g.copy_from_slice(v);
                    }
                }
            }
            data.iter_mut().zip(&g).for_each(|(p, g)| *p -= lr * g);
        });
        Ok(())
    }
}

impl Optimizer for Sgd {
    fn step(&mut self) -> Result<(), NapcasError> {
        for index in 0..self.slots.len() {
            self.update(index)?;
        }
        Ok(())
    }

    fn step_param(&mut self, param: &Parameter) -> Result<(), NapcasError> {
        let index = find_param(self.slots.iter().map(|s| &s.param), param)?;
        self.update(index)
    }

    fn zero_grad(&self) {
        for slot in &self.slots {
            slot.param.zero_grad();
        }
    }

    fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.velocity = None;
        }
    }

    fn state_dict(&self) -> OptimizerState {
        OptimizerState::Sgd {
            lr: self.config.lr,
            velocity: self
                .slots
                .iter()
                .filter_map(|s| s.velocity.as_ref().map(|v| (s.name.clone(), v.clone())))
                .collect(),
        }
    }

    fn load_state_dict(&mut self, state: &OptimizerState) -> Result<(), NapcasError> {
        let (lr, velocity) = match state {
            OptimizerState::Sgd { lr, velocity } => (*lr, velocity),
            other => {
                return Err(NapcasError::OptimizerState(format!(
                    "cannot load {} state into SGD",
                    other.kind()
                )))
            }
        };
        let mut restored: BTreeMap<&str, Vec<f32>> = BTreeMap::new();
        for (name, buffer) in velocity {
            let slot = self
                .slots
                .iter()
                .find(|s| &s.name == name)
                .ok_or_else(|| NapcasError::OptimizerState(format!("unknown parameter '{}'", name)))?;
            check_buffer(name, buffer, &slot.param)?;
            restored.insert(name.as_str(), buffer.clone());
        }
        for slot in &mut self.slots {
            slot.velocity = restored.remove(slot.name.as_str());
        }
        self.config.lr = lr;
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.config.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.config.lr = lr;
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
