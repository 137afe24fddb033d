use crate::error::NapcasError;
use crate::ops::view;
use crate::tensor::utils::check_dim;
use crate::tensor::Tensor;

/// Shape manipulation. Tensors stay contiguous, so every method returns a
/// new tensor holding its own copy in the new layout.
impl Tensor {
    /// Returns the same values under `new_shape`.
    ///
    /// # Example
    /// ```
    /// use napcas_core::Tensor;
    ///
    /// let t = Tensor::new((0..6).map(|x| x as f32).collect(), vec![2, 3]).unwrap();
    /// let r = t.reshape(&[3, 2]).unwrap();
    /// assert_eq!(r.shape(), vec![3, 2]);
    /// assert_eq!(r.get_f32_data(), t.get_f32_data());
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Tensor, NapcasError> {
        view::reshape_op(self, new_shape)
    }

    /// Reorders the axes: axis `i` of the result is axis `dims[i]` of `self`.
    pub fn permute(&self, dims: &[usize]) -> Result<Tensor, NapcasError> {
        view::permute_op(self, dims)
    }

    /// Swaps two axes.
    ///
    /// # Example
    /// ```
    /// use napcas_core::Tensor;
    ///
    /// let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    /// let tt = t.transpose(0, 1).unwrap();
    /// assert_eq!(tt.shape(), vec![3, 2]);
    /// assert_eq!(tt.get_f32_data(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Tensor, NapcasError> {
        view::transpose_op(self, dim0, dim1)
    }

    /// Inserts an axis of size 1 at `dim` (`dim == rank` appends one).
    pub fn unsqueeze(&self, dim: usize) -> Result<Tensor, NapcasError> {
        let mut shape = self.shape();
        check_dim(dim, shape.len() + 1)?;
        shape.insert(dim, 1);
        view::reshape_op(self, &shape)
    }

    /// Collapses axes `start_dim..` into one.
    pub fn flatten(&self, start_dim: usize) -> Result<Tensor, NapcasError> {
        let shape = self.shape();
        check_dim(start_dim, shape.len())?;
        let mut new_shape = shape[..start_dim].to_vec();
        new_shape.push(shape[start_dim..].iter().product());
        view::reshape_op(self, &new_shape)
    }

    /// Slice `start..start + length` along `dim`.
    pub fn narrow(&self, dim: usize, start: usize, length: usize) -> Result<Tensor, NapcasError> {
        view::narrow_op(self, dim, start, length)
    }

    /// Joins tensors along an existing axis.
    pub fn concat(tensors: &[Tensor], dim: usize) -> Result<Tensor, NapcasError> {
        view::concat_op(tensors, dim)
    }

    /// Joins equally-shaped tensors along a new axis `dim`.
    pub fn stack(tensors: &[Tensor], dim: usize) -> Result<Tensor, NapcasError> {
        view::stack_op(tensors, dim)
    }
}

#[cfg(test)]
#[path = "view_methods_test.rs"]
mod tests;
