use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Adam moments of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdamParamState {
    pub step: u64,
    pub exp_avg: Vec<f32>,
    pub exp_avg_sq: Vec<f32>,
}

/// Serializable optimizer state, keyed by parameter name.
///
/// Parameters without an entry have no state yet (no step taken).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptimizerState {
    Sgd {
        lr: f32,
        velocity: BTreeMap<String, Vec<f32>>,
    },
    Adam {
        lr: f32,
        params: BTreeMap<String, AdamParamState>,
    },
}

impl OptimizerState {
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizerState::Sgd { .. } => "sgd",
            OptimizerState::Adam { .. } => "adam",
        }
    }

    pub fn learning_rate(&self) -> f32 {
        match self {
            OptimizerState::Sgd { lr, .. } | OptimizerState::Adam { lr, .. } => *lr,
        }
    }
}
