use crate::autograd::no_grad;
use crate::error::NapcasError;
use crate::nn::{Module, Parameter};
use crate::optim::optimizer_state::{AdamParamState, OptimizerState};
use crate::optim::optimizer_trait::{check_buffer, check_registration, find_param, Optimizer};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hyperparameters of [`Adam`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamConfig {
    pub lr: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub eps: f32,
    /// L2 penalty added to the gradient.
    pub weight_decay: f32,
}

impl Default for AdamConfig {
    fn default() -> Self {
        AdamConfig {
            lr: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay: 0.0,
        }
    }
}

impl AdamConfig {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` unless `lr`, `eps` and
    /// `weight_decay` are non-negative and both betas lie in `[0, 1)`.
    pub fn validate(&self) -> Result<(), NapcasError> {
        for (name, value) in [
            ("lr", self.lr),
            ("eps", self.eps),
            ("weight_decay", self.weight_decay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NapcasError::ConfigurationError(format!(
                    "Adam {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        for (name, beta) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&beta) {
                return Err(NapcasError::ConfigurationError(format!(
                    "Adam {} must be in [0, 1), got {}",
                    name, beta
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct AdamSlot {
    name: String,
    param: Parameter,
    state: Option<AdamParamState>,
}

/// Implements the Adam optimization algorithm (Kingma & Ba, 2014).
///
/// Keeps bias-corrected running averages of the gradient and its square for
/// each parameter.
///
/// There is no global step counter: each parameter counts the steps in which
/// it actually had a gradient, and its bias correction uses that count. A
/// parameter whose gradient was unset for some `step()` calls is therefore
/// corrected as if those calls never happened. The count is the `step` field
/// of each [`AdamParamState`] in [`Optimizer::state_dict`]. When every
/// parameter receives a gradient on every step, this is identical to a global
/// counter.
#[derive(Debug)]
pub struct Adam {
    slots: Vec<AdamSlot>,
    config: AdamConfig,
}

impl Adam {
    /// # Errors
    /// * `NapcasError::ConfigurationError` if the config is invalid.
    /// * `NapcasError::OptimizerState` if a name or parameter appears twice.
    pub fn new(params: Vec<(String, Parameter)>, config: AdamConfig) -> Result<Self, NapcasError> {
        config.validate()?;
        check_registration(&params)?;
        debug!("Adam over {} parameters: {:?}", params.len(), config);
        Ok(Adam {
            slots: params
                .into_iter()
                .map(|(name, param)| AdamSlot {
                    name,
                    param,
                    state: None,
                })
                .collect(),
            config,
        })
    }

    /// Optimizer over all parameters of `module`.
    pub fn for_module(module: &dyn Module, config: AdamConfig) -> Result<Self, NapcasError> {
        Adam::new(module.named_parameters(), config)
    }

    pub fn config(&self) -> &AdamConfig {
        &self.config
    }

    fn update(&mut self, index: usize) -> Result<(), NapcasError> {
        let AdamConfig {
            lr,
            beta1,
            beta2,
            eps,
            weight_decay,
        } = self.config;
        let slot = &mut self.slots[index];
        let grad = match slot.param.grad() {
            Some(g) => g.get_f32_data(),
            None => return Ok(()),
        };
        let numel = grad.len();
        let state = slot.state.get_or_insert_with(|| AdamParamState {
            step: 0,
            exp_avg: vec![0.0; numel],
            exp_avg_sq: vec![0.0; numel],
        });
        state.step += 1;
        let step = i32::try_from(state.step).unwrap_or(i32::MAX);
        let bias_correction1 = 1.0 - beta1.powi(step);
        let bias_correction2 = 1.0 - beta2.powi(step);

        let _guard = no_grad();
        slot.param.with_data_mut(|data| {
            for (i, p) in data.iter_mut().enumerate() {
                let g = grad[i] + weight_decay * *p;
                let m = &mut state.exp_avg[i];
                let v = &mut state.exp_avg_sq[i];
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / bias_correction1;
                let v_hat = *v / bias_correction2;
                *p -= lr * m_hat / (v_hat.sqrt() + eps);
            }
        });
        Ok(())
    }
}

impl Optimizer for Adam {
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
            slot.state = None;
        }
    }

    fn state_dict(&self) -> OptimizerState {
        OptimizerState::Adam {
            lr: self.config.lr,
            params: self
                .slots
                .iter()
                .filter_map(|s| s.state.as_ref().map(|st| (s.name.clone(), st.clone())))
                .collect(),
        }
    }

    fn load_state_dict(&mut self, state: &OptimizerState) -> Result<(), NapcasError> {
        let (lr, params) = match state {
            OptimizerState::Adam { lr, params } => (*lr, params),
            other => {
                return Err(NapcasError::OptimizerState(format!(
                    "cannot load {} state into Adam",
                    other.kind()
                )))
            }
        };
        let mut restored: BTreeMap<&str, AdamParamState> = BTreeMap::new();
        for (name, param_state) in params {
            let slot = self
                .slots
                .iter()
                .find(|s| &s.name == name)
                .ok_or_else(|| NapcasError::OptimizerState(format!("unknown parameter '{}'", name)))?;
            check_buffer(name, &param_state.exp_avg, &slot.param)?;
            check_buffer(name, &param_state.exp_avg_sq, &slot.param)?;
            restored.insert(name.as_str(), param_state.clone());
        }
        for slot in &mut self.slots {
            slot.state = restored.remove(slot.name.as_str());
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
#[path = "adam_test.rs"]
mod tests;
