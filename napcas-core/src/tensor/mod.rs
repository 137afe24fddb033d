use crate::error::NapcasError;
use crate::tensor_data::TensorData;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod activation_methods;
mod arithmetic_methods;
mod autograd_methods;
pub mod create;
mod reduction_methods;
pub mod utils;
mod view_methods;

pub use create::{full, one_hot, ones, ones_like, rand_uniform, randn, scalar, zeros, zeros_like};

/// Represents a multi-dimensional array of `f32` values.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared handles:** cloning a `Tensor` is cheap and yields a new handle
///     to the same storage. Graph nodes, optimizers and modules all hold such
///     handles to the same parameter.
/// 2.  **Interior mutability:** `requires_grad`, `grad` and (for optimizers and
///     initializers) the values themselves can be modified through `&Tensor`.
pub struct Tensor {
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new leaf tensor from row-major data and a shape.
    ///
    /// # Errors
    /// * `NapcasError::ShapeError` if a dimension is zero.
    /// * `NapcasError::TensorCreationError` if `data.len()` differs from the shape's element count.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, NapcasError> {
        let tensor_data = TensorData::new(data, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Wraps a buffer whose shape was already validated by the caller
    /// (operation outputs, gradients, detached copies).
    pub(crate) fn from_raw(data: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Tensor {
            data: Arc::new(RwLock::new(TensorData::from_raw(data, shape))),
        }
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// Locks are never held across user code, so a poisoned lock still
    /// guards consistent data and is recovered.
    pub(crate) fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Acquires a write lock on the tensor's data.
    pub(crate) fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Returns the number of dimensions. Scalars have rank 0.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Returns a copy of the values in row-major order.
    pub fn get_f32_data(&self) -> Vec<f32> {
        self.read_data().data.clone()
    }

    /// Copies out values and shape under a single lock.
    pub(crate) fn snapshot(&self) -> (Vec<f32>, Vec<usize>) {
        let guard = self.read_data();
        (guard.data.clone(), guard.shape.clone())
    }

    /// Returns the single value of a one-element tensor.
    ///
    /// # Errors
    /// Returns `NapcasError::ShapeError` if the tensor holds more than one element.
    pub fn item(&self) -> Result<f32, NapcasError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(NapcasError::ShapeError {
                shape: guard.shape.clone(),
                reason: "item() requires a tensor with exactly one element".to_string(),
            });
        }
        Ok(guard.data[0])
    }

    /// Returns the value at `coords`.
    ///
    /// # Errors
    /// Returns `NapcasError::IndexOutOfBounds` if `coords` does not address an element.
    pub fn at(&self, coords: &[usize]) -> Result<f32, NapcasError> {
        let guard = self.read_data();
        if coords.len() != guard.shape.len()
            || coords.iter().zip(guard.shape.iter()).any(|(c, d)| c >= d)
        {
            return Err(NapcasError::IndexOutOfBounds {
                index: coords.to_vec(),
                shape: guard.shape.clone(),
            });
        }
        Ok(guard.data[guard.get_offset(coords)])
    }

    /// Mutates the values in place.
    ///
    /// Reserved for parameter initialization and optimizer updates: it
    /// bypasses autograd and must not be used on tensors whose current
    /// values are still needed by a pending backward pass.
    pub fn with_data_mut<R>(&self, f: impl FnOnce(&mut [f32]) -> R) -> R {
        let mut guard = self.write_data();
        f(&mut guard.data)
    }

    /// Overwrites this tensor's values with those of `source`.
    ///
    /// # Errors
    /// Returns `NapcasError::ShapeMismatch` if the shapes differ.
    pub fn copy_from(&self, source: &Tensor) -> Result<(), NapcasError> {
        if Arc::ptr_eq(&self.data, &source.data) {
            return Ok(());
        }
        let values = source.get_f32_data();
        let mut guard = self.write_data();
        let source_shape = source.shape();
        if guard.shape != source_shape {
            return Err(NapcasError::ShapeMismatch {
                expected: guard.shape.clone(),
                actual: source_shape,
                operation: "copy_from".to_string(),
            });
        }
        guard.data = values;
        Ok(())
    }

    /// Stable identity of the underlying storage, shared by all clones.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.data) as *const () as usize
    }
}

impl Clone for Tensor {
    /// Cloning creates a new handle to the same storage.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Tensor {
    /// Two tensors are equal when they are handles to the same storage.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Tensor {}

impl Hash for Tensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        let guard = self.read_data();
        let mut s = f.debug_struct("Tensor");
        s.field("shape", &guard.shape);
        if guard.data.len() > PREVIEW {
            s.field("data", &format_args!("{:?}...", &guard.data[..PREVIEW]));
        } else {
            s.field("data", &guard.data);
        }
        s.field("requires_grad", &guard.requires_grad)
            .field("is_leaf", &guard.grad_fn.is_none())
            .finish()
    }
}

#[cfg(test)]
#[path = "tensor_test.rs"]
mod tests;
