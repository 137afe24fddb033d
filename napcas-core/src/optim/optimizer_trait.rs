use crate::error::NapcasError;
use crate::nn::Parameter;
use crate::optim::optimizer_state::OptimizerState;
use log::warn;
use std::collections::HashSet;
use std::fmt::Debug;

/// Trait for optimization algorithms.
///
/// Optimizers update the parameters they were built with, in place and
/// outside of autograd, based on the gradients accumulated by the last
/// backward pass.
pub trait Optimizer: Debug + Send {
    /// Updates every registered parameter that has a gradient.
    fn step(&mut self) -> Result<(), NapcasError>;

    /// Updates a single registered parameter.
    ///
    /// # Errors
    /// Returns `NapcasError::OptimizerState` if `param` was not registered.
    fn step_param(&mut self, param: &Parameter) -> Result<(), NapcasError>;

    /// Clears the gradients of all registered parameters.
    fn zero_grad(&self);

    /// Forgets accumulated state (momentum buffers, moments, step counts).
    fn reset(&mut self);

    /// Snapshot of the learning rate and per-parameter state.
    fn state_dict(&self) -> OptimizerState;

    /// Restores a snapshot produced by [`Optimizer::state_dict`].
    ///
    /// # Errors
    /// * `NapcasError::OptimizerState` if the snapshot belongs to another
    ///   optimizer kind or names an unknown parameter.
    /// * `NapcasError::ShapeMismatch` if a buffer does not fit its parameter.
    fn load_state_dict(&mut self, state: &OptimizerState) -> Result<(), NapcasError>;

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);
}

/// Rejects duplicate names and parameters registered twice.
pub(crate) fn check_registration(params: &[(String, Parameter)]) -> Result<(), NapcasError> {
    if params.is_empty() {
        warn!("optimizer created without parameters, step() will do nothing");
    }
    let mut names = HashSet::new();
    let mut tensors = HashSet::new();
    for (name, param) in params {
        if !names.insert(name.as_str()) {
            return Err(NapcasError::OptimizerState(format!(
                "parameter name '{}' registered twice",
                name
            )));
        }
        if !tensors.insert(param.id()) {
            return Err(NapcasError::OptimizerState(format!(
                "parameter '{}' is already registered under another name",
                name
            )));
        }
    }
    Ok(())
}

/// Position of `param` among the registered parameters, by identity.
pub(crate) fn find_param<'a, I>(params: I, param: &Parameter) -> Result<usize, NapcasError>
where
    I: IntoIterator<Item = &'a Parameter>,
{
    params
        .into_iter()
        .position(|p| p == param)
        .ok_or_else(|| {
            NapcasError::OptimizerState(format!(
                "parameter {:?} is not registered with this optimizer",
                param.shape()
            ))
        })
}

/// Checks a saved buffer against the parameter it belongs to.
pub(crate) fn check_buffer(name: &str, buffer: &[f32], param: &Parameter) -> Result<(), NapcasError> {
    if buffer.len() != param.numel() {
        return Err(NapcasError::ShapeMismatch {
            expected: param.shape(),
            actual: vec![buffer.len()],
            operation: format!("load optimizer state for '{}'", name),
        });
    }
    Ok(())
}
