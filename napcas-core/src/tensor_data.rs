use crate::autograd::graph::{self, NodeId};
use crate::error::NapcasError;
use crate::tensor::utils::{calculate_strides, validate_shape};
use crate::tensor::Tensor;

/// Internal storage and metadata for a Tensor.
///
/// This struct holds the data buffer, shape, strides and autograd-related
/// information. It is wrapped in `Arc<RwLock<TensorData>>` by the `Tensor`
/// struct to allow shared handles and interior mutability.
#[derive(Debug)]
pub struct TensorData {
    /// Flat row-major buffer, exclusively owned by this tensor.
    pub(crate) data: Vec<f32>,

    // --- Metadata ---
    /// The shape (dimensions) of the tensor. Empty for scalars.
    pub(crate) shape: Vec<usize>,
    /// Contiguous strides for each dimension.
    pub(crate) strides: Vec<usize>,

    // --- Autograd Metadata ---
    /// If true, operations involving this tensor are recorded in the graph.
    pub(crate) requires_grad: bool,
    /// The accumulated gradient, same shape as `data`.
    pub(crate) grad: Option<Tensor>,
    /// Handle of the graph node that produced this tensor.
    /// Leaf tensors created by the user have `grad_fn = None`.
    pub(crate) grad_fn: Option<NodeId>,
}

impl TensorData {
    /// Creates a new `TensorData` from a flat buffer and a shape.
    ///
    /// # Errors
    /// Returns `NapcasError::ShapeError` if the shape contains a zero dimension and
    /// `NapcasError::TensorCreationError` if `data.len()` does not match the shape.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, NapcasError> {
        validate_shape(&shape)?;
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(NapcasError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Self::from_raw(data, shape))
    }

    pub(crate) fn from_raw(data: Vec<f32>, shape: Vec<usize>) -> Self {
        let strides = calculate_strides(&shape);
        TensorData {
            data,
            shape,
            strides,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        }
    }

    /// Number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Linear offset of the element at `coords`.
    pub fn get_offset(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(self.strides.iter())
            .map(|(c, s)| c * s)
            .sum()
    }
}

impl Drop for TensorData {
    fn drop(&mut self) {
        // The node is owned by the engine arena; the last handle of the tensor
        // it produced is what keeps it reachable.
        if let Some(id) = self.grad_fn.take() {
            graph::release(id);
        }
    }
}
