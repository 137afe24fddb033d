//! JSON checkpoints of module parameters and optimizer state.
//!
//! Parameters are stored by their hierarchical name with their shape, so a
//! checkpoint can be loaded into any module that produces the same names and
//! shapes.

use crate::error::NapcasError;
use crate::nn::Module;
use crate::optim::{Optimizer, OptimizerState};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Version written into new checkpoints.
pub const FORMAT_VERSION: u32 = 1;

/// Shape and row-major values of one tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorRecord {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// Parameter values of a module keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleState {
    pub parameters: BTreeMap<String, TensorRecord>,
}

/// Model parameters plus optional optimizer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub format_version: u32,
    pub model: ModuleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<OptimizerState>,
}

/// Captures the current parameter values of `module`.
pub fn module_state(module: &dyn Module) -> ModuleState {
    ModuleState {
        parameters: module
            .named_parameters()
            .into_iter()
            .map(|(name, p)| {
                let (data, shape) = p.snapshot();
                (name, TensorRecord { shape, data })
            })
            .collect(),
    }
}

/// Copies `state` into the parameters of `module`.
///
/// Every parameter must be present with a matching shape and no extra
/// entries are allowed; nothing is written unless the whole state fits.
///
/// # Errors
/// * `NapcasError::Serialization` for a missing or unexpected parameter name.
/// * `NapcasError::ShapeMismatch` for a shape or length that does not fit.
pub fn load_module_state(module: &dyn Module, state: &ModuleState) -> Result<(), NapcasError> {
    let params = module.named_parameters();
    for (name, param) in &params {
        let record = state.parameters.get(name).ok_or_else(|| {
            NapcasError::Serialization(format!("checkpoint has no entry for parameter '{}'", name))
        })?;
        let expected = param.shape();
        if record.shape != expected || record.data.len() != param.numel() {
            return Err(NapcasError::ShapeMismatch {
                expected,
                actual: record.shape.clone(),
                operation: format!("load parameter '{}'", name),
            });
        }
    }
    if state.parameters.len() != params.len() {
        let unexpected = state
            .parameters
            .keys()
            .find(|k| !params.iter().any(|(name, _)| name == *k));
        return Err(NapcasError::Serialization(format!(
            "checkpoint holds parameters the module does not have: {:?}",
            unexpected
        )));
    }
    for (name, param) in &params {
        if let Some(record) = state.parameters.get(name) {
            param.with_data_mut(|d| d.copy_from_slice(&record.data));
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), NapcasError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, NapcasError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes the parameters of `module` to `path` as JSON.
pub fn save_module(module: &dyn Module, path: impl AsRef<Path>) -> Result<(), NapcasError> {
    let path = path.as_ref();
    let state = module_state(module);
    write_json(&state, path)?;
    info!("saved {} parameters to {}", state.parameters.len(), path.display());
    Ok(())
}

/// Loads parameters written by [`save_module`] into `module`.
///
/// # Errors
/// `NapcasError::Io` if the file cannot be read, otherwise as [`load_module_state`].
pub fn load_module(module: &dyn Module, path: impl AsRef<Path>) -> Result<(), NapcasError> {
    let path = path.as_ref();
    let state: ModuleState = read_json(path)?;
    load_module_state(module, &state)?;
    info!("loaded {} parameters from {}", state.parameters.len(), path.display());
    Ok(())
}

/// Writes the module parameters and, if given, the optimizer state.
pub fn save_checkpoint(
    module: &dyn Module,
    optimizer: Option<&dyn Optimizer>,
    path: impl AsRef<Path>,
) -> Result<(), NapcasError> {
    let path = path.as_ref();
    let checkpoint = Checkpoint {
        format_version: FORMAT_VERSION,
        model: module_state(module),
        optimizer: optimizer.map(|opt| opt.state_dict()),
    };
    write_json(&checkpoint, path)?;
    info!(
        "saved checkpoint ({} parameters, optimizer state: {}) to {}",
        checkpoint.model.parameters.len(),
        checkpoint.optimizer.is_some(),
        path.display()
    );
    Ok(())
}

/// Restores a checkpoint written by [`save_checkpoint`].
///
/// The optimizer state is loaded when both the file and the caller provide
/// one. The model is restored before the optimizer, and neither is touched if
/// the model part does not fit.
///
/// # Errors
/// * `NapcasError::Serialization` for an unknown format version, in addition
///   to the errors of [`load_module_state`].
/// * Errors of [`Optimizer::load_state_dict`].
pub fn load_checkpoint(
    module: &dyn Module,
    optimizer: Option<&mut dyn Optimizer>,
    path: impl AsRef<Path>,
) -> Result<(), NapcasError> {
    let path = path.as_ref();
    let checkpoint: Checkpoint = read_json(path)?;
    if checkpoint.format_version != FORMAT_VERSION {
        return Err(NapcasError::Serialization(format!(
            "unsupported checkpoint version {} (expected {})",
            checkpoint.format_version, FORMAT_VERSION
        )));
    }
    load_module_state(module, &checkpoint.model)?;
    match (optimizer, &checkpoint.optimizer) {
        (Some(opt), Some(state)) => opt.load_state_dict(state)?,
        (Some(_), None) => warn!("{} holds no optimizer state", path.display()),
        (None, _) => {}
    }
    info!("loaded checkpoint from {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "checkpoint_test.rs"]
mod tests;
