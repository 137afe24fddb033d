//! Tensor library with reverse-mode automatic differentiation, layers,
//! losses and optimizers.
//!
//! ```
//! use napcas_core::Tensor;
//!
//! let a = Tensor::new(vec![2.0], vec![1]).unwrap().with_requires_grad();
//! let b = Tensor::new(vec![3.0], vec![1]).unwrap().with_requires_grad();
//! let c = a.mul(&b).unwrap().add(&a).unwrap().sum().unwrap();
//! c.backward().unwrap();
//! assert_eq!(a.grad().unwrap().get_f32_data(), vec![4.0]);
//! assert_eq!(b.grad().unwrap().get_f32_data(), vec![2.0]);
//! ```

pub mod autograd;
pub mod checkpoint;
pub mod error;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use error::NapcasError;
pub use tensor::Tensor;
