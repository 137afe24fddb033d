use crate::dataset::Dataset;
use crate::samplers::{RandomSampler, Sampler, SequentialSampler};
use log::debug;
use napcas_core::autograd::no_grad;
use napcas_core::{NapcasError, Tensor};
use serde::{Deserialize, Serialize};

/// Batching options of a [`DataLoader`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLoaderConfig {
    pub batch_size: usize,
    /// Draw a fresh permutation of the dataset every epoch.
    pub shuffle: bool,
    /// Skip the final batch when it is smaller than `batch_size`.
    pub drop_last: bool,
    /// Seed of the shuffling generator. Ignored when `shuffle` is false.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        DataLoaderConfig {
            batch_size: 1,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }
}

impl DataLoaderConfig {
    pub fn validate(&self) -> Result<(), NapcasError> {
        if self.batch_size == 0 {
            return Err(NapcasError::ConfigurationError(
                "batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Groups the `(input, target)` samples of a dataset into mini-batches.
///
/// Samples of one batch are stacked along a new leading axis, so a dataset
/// of `[F]` inputs and scalar targets yields `[B, F]` and `[B]` batches.
/// Batches never carry gradient history.
///
/// ```
/// use napcas_core::Tensor;
/// use napcas_data::{DataLoader, DataLoaderConfig, TensorDataset};
///
/// let inputs = Tensor::new((0..10).map(|v| v as f32).collect(), vec![5, 2]).unwrap();
/// let targets = Tensor::new(vec![0.0, 1.0, 0.0, 1.0, 0.0], vec![5]).unwrap();
/// let dataset = TensorDataset::new(inputs, targets).unwrap();
/// let config = DataLoaderConfig { batch_size: 2, ..Default::default() };
/// let loader = DataLoader::new(dataset, config).unwrap();
///
/// let shapes: Vec<Vec<usize>> = loader.iter().map(|b| b.unwrap().0.shape()).collect();
/// assert_eq!(shapes, vec![vec![2, 2], vec![2, 2], vec![1, 2]]);
/// ```
#[derive(Debug)]
pub struct DataLoader<D: Dataset<Item = (Tensor, Tensor)>> {
    dataset: D,
    sampler: Box<dyn Sampler>,
    config: DataLoaderConfig,
}

impl<D: Dataset<Item = (Tensor, Tensor)>> DataLoader<D> {
    /// Uses a [`RandomSampler`] when `config.shuffle` is set and a
    /// [`SequentialSampler`] otherwise.
    pub fn new(dataset: D, config: DataLoaderConfig) -> Result<Self, NapcasError> {
        let sampler: Box<dyn Sampler> = if config.shuffle {
            Box::new(RandomSampler::shuffled(config.seed))
        } else {
            Box::new(SequentialSampler::new())
        };
        Self::with_sampler(dataset, config, sampler)
    }

    /// Visits indices in the order given by `sampler`; `config.shuffle` is ignored.
    pub fn with_sampler(
        dataset: D,
        config: DataLoaderConfig,
        sampler: Box<dyn Sampler>,
    ) -> Result<Self, NapcasError> {
        config.validate()?;
        debug!(
            "DataLoader over {} samples, batch_size {}, drop_last {}",
            dataset.len(),
            config.batch_size,
            config.drop_last
        );
        Ok(DataLoader {
            dataset,
            sampler,
            config,
        })
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// Number of batches one epoch yields.
    pub fn len(&self) -> usize {
        let samples = self.sampler.len(self.dataset.len());
        if self.config.drop_last {
            samples / self.config.batch_size
        } else {
            samples.div_ceil(self.config.batch_size)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a new epoch.
    pub fn iter(&self) -> Batches<'_, D> {
        Batches {
            loader: self,
            indices: self.sampler.iter(self.dataset.len()),
        }
    }

    fn collate(&self, indices: &[usize]) -> Result<(Tensor, Tensor), NapcasError> {
        let _guard = no_grad();
        let (inputs, targets): (Vec<Tensor>, Vec<Tensor>) = indices
            .iter()
            .map(|&i| self.dataset.get(i))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();
        Ok((Tensor::stack(&inputs, 0)?, Tensor::stack(&targets, 0)?))
    }
}

impl<'a, D: Dataset<Item = (Tensor, Tensor)>> IntoIterator for &'a DataLoader<D> {
    type Item = Result<(Tensor, Tensor), NapcasError>;
    type IntoIter = Batches<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One epoch of batches from a [`DataLoader`].
pub struct Batches<'a, D: Dataset<Item = (Tensor, Tensor)>> {
    loader: &'a DataLoader<D>,
    indices: Box<dyn Iterator<Item = usize> + Send + Sync>,
}

impl<D: Dataset<Item = (Tensor, Tensor)>> Iterator for Batches<'_, D> {
    type Item = Result<(Tensor, Tensor), NapcasError>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch_size = self.loader.config.batch_size;
        let indices: Vec<usize> = self.indices.by_ref().take(batch_size).collect();
        if indices.is_empty() || (self.loader.config.drop_last && indices.len() < batch_size) {
            return None;
        }
        Some(self.loader.collate(&indices))
    }
}

#[cfg(test)]
#[path = "dataloader_test.rs"]
mod tests;
