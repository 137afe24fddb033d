use crate::error::NapcasError;
use crate::nn::layers::activation::{ReLU, Sigmoid};
use crate::nn::layers::linear::Linear;
use crate::nn::layers::sequential::Sequential;
use crate::nn::losses::BCELoss;
use crate::nn::module::{children_parameters, Module};
use crate::nn::parameter::Parameter;
use crate::optim::Optimizer;
use crate::tensor::Tensor;
use log::debug;
use rand::Rng;

/// Losses of one [`Gan::train_step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GanLosses {
    pub generator_loss: f32,
    pub discriminator_loss: f32,
}

/// `Linear` layers of the given sizes with ReLU in between and a Sigmoid on
/// the output.
fn sigmoid_mlp<R: Rng + ?Sized>(
    sizes: &[usize],
    role: &str,
    rng: &mut R,
) -> Result<Sequential, NapcasError> {
    if sizes.len() < 2 {
        return Err(NapcasError::ConfigurationError(format!(
            "{} needs at least an input and an output size, got {:?}",
            role, sizes
        )));
    }
    let mut net = Sequential::new();
    for (i, pair) in sizes.windows(2).enumerate() {
        net.push(Box::new(Linear::new(pair[0], pair[1], true, rng)?));
        if i + 2 < sizes.len() {
            net.push(Box::new(ReLU));
        } else {
            net.push(Box::new(Sigmoid));
        }
    }
    Ok(net)
}

/// Generative adversarial pair of fully connected networks.
///
/// The generator maps `[batch, noise_dim]` noise to `[batch, data_dim]`
/// samples in `(0, 1)`; the discriminator maps samples to the probability
/// `[batch, 1]` that they are real.
#[derive(Debug)]
pub struct Gan {
    generator: Sequential,
    discriminator: Sequential,
    noise_dim: usize,
    data_dim: usize,
}

impl Gan {
    /// Builds both networks from their layer sizes, e.g. `[16, 32, 4]` and `[4, 32, 1]`.
    ///
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if a network has fewer than two
    /// sizes, the generator output does not match the discriminator input or
    /// the discriminator does not end in a single unit.
    pub fn new<R: Rng + ?Sized>(
        generator_layers: &[usize],
        discriminator_layers: &[usize],
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        let generator = sigmoid_mlp(generator_layers, "generator", rng)?;
        let discriminator = sigmoid_mlp(discriminator_layers, "discriminator", rng)?;
        let data_dim = generator_layers[generator_layers.len() - 1];
        if discriminator_layers[0] != data_dim {
            return Err(NapcasError::ConfigurationError(format!(
                "generator produces {} features but the discriminator expects {}",
                data_dim, discriminator_layers[0]
            )));
        }
        if discriminator_layers[discriminator_layers.len() - 1] != 1 {
            return Err(NapcasError::ConfigurationError(
                "the discriminator must end in a single unit".to_string(),
            ));
        }
        debug!(
            "GAN: generator {:?}, discriminator {:?}",
            generator_layers, discriminator_layers
        );
        Ok(Gan {
            generator,
            discriminator,
            noise_dim: generator_layers[0],
            data_dim,
        })
    }

    pub fn generator(&self) -> &Sequential {
        &self.generator
    }

    pub fn discriminator(&self) -> &Sequential {
        &self.discriminator
    }

    pub fn noise_dim(&self) -> usize {
        self.noise_dim
    }

    pub fn generate(&self, noise: &Tensor) -> Result<Tensor, NapcasError> {
        self.generator.forward(noise)
    }

    pub fn discriminate(&self, samples: &Tensor) -> Result<Tensor, NapcasError> {
        self.discriminator.forward(samples)
    }

    fn check_batch(&self, real: &Tensor, noise: &Tensor) -> Result<usize, NapcasError> {
        let (real_shape, noise_shape) = (real.shape(), noise.shape());
        match (real_shape.as_slice(), noise_shape.as_slice()) {
            ([b, d], [nb, nd]) if *d == self.data_dim && *nd == self.noise_dim && b == nb => Ok(*b),
            _ => Err(NapcasError::ShapeMismatch {
                expected: vec![real_shape.first().copied().unwrap_or(0), self.noise_dim],
                actual: noise_shape.clone(),
                operation: format!(
                    "GAN train_step (real must be [batch, {}], noise [batch, {}])",
                    self.data_dim, self.noise_dim
                ),
            }),
        }
    }

    /// One adversarial update with binary cross-entropy.
    ///
    /// The discriminator is trained first on `real` (label 1) and on detached
    /// generated samples (label 0), so its update leaves the generator
    /// untouched. The generator is then trained to make the discriminator
    /// output 1 on fresh samples from the same `noise`. Each optimizer should
    /// hold the parameters of its own network.
    pub fn train_step(
        &self,
        real: &Tensor,
        noise: &Tensor,
        gen_opt: &mut dyn Optimizer,
        disc_opt: &mut dyn Optimizer,
    ) -> Result<GanLosses, NapcasError> {
        let batch = self.check_batch(real, noise)?;
        let real_labels = Tensor::ones(&[batch, 1])?;
        let fake_labels = Tensor::zeros(&[batch, 1])?;
        let bce = BCELoss::default();

        disc_opt.zero_grad();
        let fake = self.generate(noise)?.detach();
        let d_real = bce.calculate(&self.discriminate(real)?, &real_labels)?;
        let d_fake = bce.calculate(&self.discriminate(&fake)?, &fake_labels)?;
        let d_loss = d_real.add(&d_fake)?;
        d_loss.backward()?;
        disc_opt.step()?;

        gen_opt.zero_grad();
        let fake = self.generate(noise)?;
        let g_loss = bce.calculate(&self.discriminate(&fake)?, &real_labels)?;
        g_loss.backward()?;
        gen_opt.step()?;

        Ok(GanLosses {
            generator_loss: g_loss.item()?,
            discriminator_loss: d_loss.item()?,
        })
    }
}

impl Module for Gan {
    /// Same as [`Gan::generate`].
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        self.generate(input)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        children_parameters(self)
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("generator".to_string(), &self.generator as &dyn Module),
            ("discriminator".to_string(), &self.discriminator),
        ]
    }
}

#[cfg(test)]
#[path = "gan_test.rs"]
mod tests;
