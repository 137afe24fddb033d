use crate::error::NapcasError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Randomly zeroes elements with probability `p` during training and scales
/// the survivors by `1 / (1 - p)`. Identity in evaluation mode.
#[derive(Debug)]
pub struct Dropout {
    p: f32,
    training: AtomicBool,
    rng: Mutex<StdRng>,
}

impl Dropout {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` unless `0 <= p < 1`.
    pub fn new(p: f32, seed: u64) -> Result<Self, NapcasError> {
        if !(0.0..1.0).contains(&p) {
            return Err(NapcasError::ConfigurationError(format!(
                "dropout probability must be in [0, 1), got {}",
                p
            )));
        }
        Ok(Dropout {
            p,
            training: AtomicBool::new(true),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn p(&self) -> f32 {
        self.p
    }
}

impl Module for Dropout {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        if !self.is_training() || self.p == 0.0 {
            return Ok(input.clone());
        }
        let scale = 1.0 / (1.0 - self.p);
        let mask: Vec<f32> = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (0..input.numel())
                .map(|_| if rng.gen::<f32>() < self.p { 0.0 } else { scale })
                .collect()
        };
        input.mul(&Tensor::new(mask, input.shape())?)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        Vec::new()
    }

    fn set_training(&self, training: bool) {
        self.training.store(training, Ordering::Relaxed);
    }

    fn is_training(&self) -> bool {
        self.training.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "dropout_test.rs"]
mod tests;
