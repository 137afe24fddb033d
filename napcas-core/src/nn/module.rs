use crate::error::NapcasError;
use crate::nn::Parameter;
use crate::tensor::Tensor;

/// The base trait for all neural network modules (layers, containers, etc.).
///
/// A module owns its learnable [`Parameter`]s and defines its forward
/// computation in terms of tracked tensor operations, so gradients come
/// from the autograd engine without any per-module backward code.
pub trait Module: std::fmt::Debug + Send + Sync {
    /// Performs a forward pass of the module.
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError>;

    /// Returns all learnable parameters with hierarchical names
    /// (e.g. `"0.weight"`, `"layers.1.attention.q_proj.bias"`).
    ///
    /// Parameters are handles: updating one updates the module.
    fn named_parameters(&self) -> Vec<(String, Parameter)>;

    /// Returns all learnable parameters, in the order of [`Module::named_parameters`].
    fn parameters(&self) -> Vec<Parameter> {
        self.named_parameters().into_iter().map(|(_, p)| p).collect()
    }

    /// Returns the direct child modules with their names.
    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        Vec::new()
    }

    /// Switches training/evaluation mode on this module and its children.
    ///
    /// Modules whose forward does not depend on the mode only forward the call.
    fn set_training(&self, training: bool) {
        for (_, child) in self.named_children() {
            child.set_training(training);
        }
    }

    /// Whether the module is in training mode.
    ///
    /// A container is in training mode when all of its children are. Modules
    /// without mode-dependent behavior always report `true`.
    fn is_training(&self) -> bool {
        self.named_children().iter().all(|(_, child)| child.is_training())
    }

    /// Convenience for `set_training(true)`.
    fn train(&self) {
        self.set_training(true);
    }

    /// Convenience for `set_training(false)`.
    fn eval(&self) {
        self.set_training(false);
    }

    /// Resets the gradient of every parameter.
    fn zero_grad(&self) {
        for param in self.parameters() {
            param.zero_grad();
        }
    }

    /// Total number of learnable scalars.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.numel()).sum()
    }
}

/// Prefixes a child's parameter names with `prefix.`.
pub(crate) fn prefixed(prefix: &str, params: Vec<(String, Parameter)>) -> Vec<(String, Parameter)> {
    params
        .into_iter()
        .map(|(name, p)| (format!("{}.{}", prefix, name), p))
        .collect()
}

/// Collects the parameters of named children under their names.
pub(crate) fn children_parameters(module: &dyn Module) -> Vec<(String, Parameter)> {
    module
        .named_children()
        .into_iter()
        .flat_map(|(name, child)| prefixed(&name, child.named_parameters()))
        .collect()
}
