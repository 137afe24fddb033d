//! Neural network building blocks: the [`Module`] trait, parameters,
//! initializers, layers and losses.

pub mod init;
pub mod layers;
pub mod losses;
pub mod module;
pub mod parameter;

pub use layers::activation::{Activation, ReLU, Sigmoid, Softmax, Tanh};
pub use layers::attention::MultiHeadAttention;
pub use layers::conv::{Conv2d, Conv2dConfig};
pub use layers::dropout::Dropout;
pub use layers::flatten::Flatten;
pub use layers::gan::{Gan, GanLosses};
pub use layers::linear::Linear;
pub use layers::pooling::MaxPool2d;
pub use layers::rnn::{Gru, Lstm, Rnn};
pub use layers::sequential::Sequential;
pub use layers::transformer::{Transformer, TransformerConfig};
pub use losses::{BCELoss, CrossEntropyLoss, MSELoss, Reduction};
pub use module::Module;
pub use parameter::Parameter;
