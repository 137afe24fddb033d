//! Datasets, index samplers and mini-batch loading for `napcas-core` models.

pub mod dataloader;
pub mod dataset;
pub mod datasets;
pub mod samplers;

pub use dataloader::{Batches, DataLoader, DataLoaderConfig};
pub use dataset::Dataset;
pub use datasets::TensorDataset;
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
