//! Gradient-based optimizers.
//!
//! An optimizer is built from a module's `named_parameters()` and keeps its
//! per-parameter state under those names, so state dicts survive a rebuild of
//! the model.

pub mod adam;
pub mod optimizer_state;
pub mod optimizer_trait;
pub mod sgd;

pub use adam::{Adam, AdamConfig};
pub use optimizer_state::{AdamParamState, OptimizerState};
pub use optimizer_trait::Optimizer;
pub use sgd::{Sgd, SgdConfig};
