use thiserror::Error;

/// Custom error type for the Napcas framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum NapcasError {
    #[error("Invalid shape {shape:?}: {reason}")]
    ShapeError { shape: Vec<usize>, reason: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Invalid backward call: {0}")]
    InvalidBackwardCall(String),

    #[error("No gradient defined for operation {op}: {reason}")]
    UnsupportedGradient { op: String, reason: String },

    #[error("Cycle detected in the computation graph during backward pass.")]
    GraphCycle,

    #[error("Optimizer state error: {0}")]
    OptimizerState(String),

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Invalid dimension {dim} for tensor of rank {rank}")]
    InvalidDimension { dim: usize, rank: usize },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for NapcasError {
    fn from(err: std::io::Error) -> Self {
        NapcasError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NapcasError {
    fn from(err: serde_json::Error) -> Self {
        NapcasError::Serialization(err.to_string())
    }
}
