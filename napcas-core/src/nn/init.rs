//! In-place parameter initializers.
//!
//! The initializers overwrite values directly and bypass autograd, so they
//! are safe to call on parameters that require grad. Randomness always comes
//! from the caller's RNG.

use crate::error::NapcasError;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

/// Fills the tensor with the scalar value 0.
pub fn zeros_(tensor: &Tensor) {
    fill_(tensor, 0.0);
}

/// Fills the tensor with the scalar value 1.
pub fn ones_(tensor: &Tensor) {
    fill_(tensor, 1.0);
}

pub fn fill_(tensor: &Tensor, value: f32) {
    tensor.with_data_mut(|data| data.fill(value));
}

/// Fills the tensor with samples of `U(low, high)`.
///
/// # Errors
/// Returns `NapcasError::ConfigurationError` unless `low < high`.
pub fn uniform_<R: Rng + ?Sized>(
    tensor: &Tensor,
    low: f32,
    high: f32,
    rng: &mut R,
) -> Result<(), NapcasError> {
    if !(low < high) {
        return Err(NapcasError::ConfigurationError(format!(
            "uniform_ requires low < high, got [{}, {})",
            low, high
        )));
    }
    let dist = Uniform::new(low, high);
    tensor.with_data_mut(|data| data.iter_mut().for_each(|v| *v = dist.sample(rng)));
    Ok(())
}

/// Fills the tensor with samples of `N(mean, std^2)`.
///
/// # Errors
/// Returns `NapcasError::ConfigurationError` if `std` is negative or not finite.
pub fn normal_<R: Rng + ?Sized>(
    tensor: &Tensor,
    mean: f32,
    std: f32,
    rng: &mut R,
) -> Result<(), NapcasError> {
    let dist = Normal::new(mean, std).map_err(|e| {
        NapcasError::ConfigurationError(format!("normal_ with std {}: {}", std, e))
    })?;
    tensor.with_data_mut(|data| data.iter_mut().for_each(|v| *v = dist.sample(rng)));
    Ok(())
}

/// `(fan_in, fan_out)` of a weight shaped `[out, in, *kernel]`.
///
/// # Errors
/// Returns `NapcasError::ShapeError` for tensors of rank below 2.
pub fn calculate_fan_in_and_fan_out(shape: &[usize]) -> Result<(usize, usize), NapcasError> {
    if shape.len() < 2 {
        return Err(NapcasError::ShapeError {
            shape: shape.to_vec(),
            reason: "fan in and fan out require at least 2 dimensions".to_string(),
        });
    }
    let receptive_field: usize = shape[2..].iter().product();
    Ok((shape[1] * receptive_field, shape[0] * receptive_field))
}

/// Kaiming (He) uniform initialization for a leaky-ReLU slope `a`.
///
/// Samples `U(-bound, bound)` with `bound = sqrt(6 / ((1 + a^2) * fan_in))`.
/// `a = sqrt(5)` gives the `1 / sqrt(fan_in)` bound used by [`Linear`](crate::nn::Linear).
pub fn kaiming_uniform_<R: Rng + ?Sized>(
    tensor: &Tensor,
    a: f32,
    rng: &mut R,
) -> Result<(), NapcasError> {
    let (fan_in, _) = calculate_fan_in_and_fan_out(&tensor.shape())?;
    let gain = (2.0 / (1.0 + a * a)).sqrt();
    let bound = gain * (3.0 / fan_in as f32).sqrt();
    uniform_(tensor, -bound, bound, rng)
}

/// Xavier (Glorot) uniform initialization:
/// `bound = gain * sqrt(6 / (fan_in + fan_out))`.
pub fn xavier_uniform_<R: Rng + ?Sized>(
    tensor: &Tensor,
    gain: f32,
    rng: &mut R,
) -> Result<(), NapcasError> {
    let (fan_in, fan_out) = calculate_fan_in_and_fan_out(&tensor.shape())?;
    let bound = gain * (6.0 / (fan_in + fan_out) as f32).sqrt();
    uniform_(tensor, -bound, bound, rng)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
