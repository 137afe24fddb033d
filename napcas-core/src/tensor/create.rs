use crate::error::NapcasError;
use crate::tensor::utils::validate_shape;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

/// Creates a new tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, NapcasError> {
    full(shape, 0.0)
}

/// Creates a new tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, NapcasError> {
    full(shape, 1.0)
}

/// Creates a new tensor filled with `value` with the specified shape.
///
/// # Errors
/// Returns `NapcasError::ShapeError` if a dimension is zero.
pub fn full(shape: &[usize], value: f32) -> Result<Tensor, NapcasError> {
    validate_shape(shape)?;
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a 0-dimensional tensor holding `value`.
pub fn scalar(value: f32) -> Tensor {
    Tensor::from_raw(vec![value], vec![])
}

/// Creates a tensor of zeros with the same shape as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Tensor {
    Tensor::from_raw(vec![0.0; tensor.numel()], tensor.shape())
}

/// Creates a tensor of ones with the same shape as `tensor`.
pub fn ones_like(tensor: &Tensor) -> Tensor {
    Tensor::from_raw(vec![1.0; tensor.numel()], tensor.shape())
}

/// Creates a tensor with values drawn from N(`mean`, `std`).
///
/// # Errors
/// Returns `NapcasError::ConfigurationError` if `std` is negative or not finite.
pub fn randn<R: Rng + ?Sized>(
    shape: &[usize],
    mean: f32,
    std: f32,
    rng: &mut R,
) -> Result<Tensor, NapcasError> {
    validate_shape(shape)?;
    let normal = Normal::new(mean, std)
        .map_err(|e| NapcasError::ConfigurationError(format!("invalid normal distribution: {}", e)))?;
    let numel = shape.iter().product();
    let data = (0..numel).map(|_| normal.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

/// Creates a tensor with values drawn uniformly from `[low, high)`.
///
/// # Errors
/// Returns `NapcasError::ConfigurationError` if `low >= high`.
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    low: f32,
    high: f32,
    rng: &mut R,
) -> Result<Tensor, NapcasError> {
    validate_shape(shape)?;
    if !(low < high) {
        return Err(NapcasError::ConfigurationError(format!(
            "uniform range requires low < high, got [{}, {})",
            low, high
        )));
    }
    let uniform = Uniform::new(low, high);
    let numel = shape.iter().product();
    let data = (0..numel).map(|_| uniform.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

/// Encodes class indices as rows of a `[indices.len(), num_classes]` one-hot matrix.
///
/// # Errors
/// Returns `NapcasError::IndexOutOfBounds` if an index is not below `num_classes`.
pub fn one_hot(indices: &[usize], num_classes: usize) -> Result<Tensor, NapcasError> {
    let shape = vec![indices.len(), num_classes];
    validate_shape(&shape)?;
    let mut data = vec![0.0; indices.len() * num_classes];
    for (row, &class) in indices.iter().enumerate() {
        if class >= num_classes {
            return Err(NapcasError::IndexOutOfBounds {
                index: vec![row, class],
                shape,
            });
        }
        data[row * num_classes + class] = 1.0;
    }
    Tensor::new(data, shape)
}

impl Tensor {
    /// See [`zeros`].
    pub fn zeros(shape: &[usize]) -> Result<Tensor, NapcasError> {
        zeros(shape)
    }

    /// See [`ones`].
    pub fn ones(shape: &[usize]) -> Result<Tensor, NapcasError> {
        ones(shape)
    }

    /// See [`full`].
    pub fn full(shape: &[usize], value: f32) -> Result<Tensor, NapcasError> {
        full(shape, value)
    }

    /// See [`scalar`].
    pub fn scalar(value: f32) -> Tensor {
        scalar(value)
    }
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
