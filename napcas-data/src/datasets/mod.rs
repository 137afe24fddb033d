pub mod tensor_dataset;

pub use tensor_dataset::TensorDataset;
