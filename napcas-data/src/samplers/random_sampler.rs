use super::traits::Sampler;
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A sampler that randomly samples indices from a dataset.
///
/// Each call to [`Sampler::iter`] draws a new permutation (or a new set of
/// draws with replacement) from the sampler's own generator, so a seeded
/// sampler gives a reproducible sequence of epochs.
#[derive(Debug)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
    rng: Mutex<StdRng>,
}

impl RandomSampler {
    /// Creates a new `RandomSampler`.
    ///
    /// # Arguments
    ///
    /// * `replacement`: If `true`, an index can be selected multiple times.
    /// * `num_samples`: The total number of samples to draw. If `None`, it defaults to the dataset size.
    /// * `seed`: Seed of the generator; `None` seeds from system entropy.
    pub fn new(replacement: bool, num_samples: Option<usize>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RandomSampler {
            replacement,
            num_samples,
            rng: Mutex::new(rng),
        }
    }

    /// Shuffles every index once per epoch.
    pub fn shuffled(seed: Option<u64>) -> Self {
        RandomSampler::new(false, None, seed)
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        if dataset_len == 0 {
            return Box::new(std::iter::empty());
        }
        let count = self.len(dataset_len);
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.replacement {
            let indices: Vec<usize> = (0..count).map(|_| rng.gen_range(0..dataset_len)).collect();
            Box::new(indices.into_iter())
        } else {
            let mut indices: Vec<usize> = (0..dataset_len).collect();
            indices.shuffle(&mut *rng);
            indices.truncate(count);
            Box::new(indices.into_iter())
        }
    }

    fn len(&self, dataset_len: usize) -> usize {
        let requested = self.num_samples.unwrap_or(dataset_len);
        if !self.replacement && requested > dataset_len {
            warn!(
                "RandomSampler: num_samples ({}) > dataset_len ({}) without replacement, using {}",
                requested, dataset_len, dataset_len
            );
            return dataset_len;
        }
        requested
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
