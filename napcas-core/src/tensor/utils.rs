use crate::error::NapcasError;
use std::cmp::max;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Checks that every dimension of `shape` is positive.
///
/// The empty shape is accepted and denotes a scalar.
///
/// # Errors
/// Returns `NapcasError::ShapeError` if a dimension is zero.
pub fn validate_shape(shape: &[usize]) -> Result<(), NapcasError> {
    if let Some(pos) = shape.iter().position(|&d| d == 0) {
        return Err(NapcasError::ShapeError {
            shape: shape.to_vec(),
            reason: format!("dimension {} is zero, all dimensions must be positive", pos),
        });
    }
    Ok(())
}

/// Checks that `dim` is a valid axis for a tensor of rank `rank`.
pub fn check_dim(dim: usize, rank: usize) -> Result<(), NapcasError> {
    if dim >= rank {
        return Err(NapcasError::InvalidDimension { dim, rank });
    }
    Ok(())
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
///
/// # Errors
/// Returns `NapcasError::BroadcastError` if the shapes cannot be reconciled.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, NapcasError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = if i < rank_a { shape_a[rank_a - 1 - i] } else { 1 };
        let dim_b = if i < rank_b { shape_b[rank_b - 1 - i] } else { 1 };

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(NapcasError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result_shape)
}

/// Converts a linear (row-major) index to multi-dimensional coordinates.
pub fn index_to_coord(index: usize, strides: &[usize], shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut current_index = index;
    for i in 0..shape.len() {
        coord[i] = current_index / strides[i];
        current_index %= strides[i];
    }
    coord
}

/// Maps coordinates of a broadcast result back to the linear index of an
/// input of `original_shape` (trailing-aligned, size-1 dims pinned to 0).
pub fn coord_to_index_broadcasted(
    target_coord: &[usize],
    original_shape: &[usize],
    original_strides: &[usize],
) -> usize {
    let rank_diff = target_coord.len() - original_shape.len();
    let mut index = 0;
    for i in 0..original_shape.len() {
        if original_shape[i] != 1 {
            index += target_coord[rank_diff + i] * original_strides[i];
        }
    }
    index
}

/// Materialises `data` (of `shape`) broadcast to `target_shape`.
///
/// `target_shape` must be a valid broadcast of `shape`.
pub fn expand_data(data: &[f32], shape: &[usize], target_shape: &[usize]) -> Vec<f32> {
    if shape == target_shape {
        return data.to_vec();
    }
    let numel: usize = target_shape.iter().product();
    let target_strides = calculate_strides(target_shape);
    let strides = calculate_strides(shape);
    (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &target_strides, target_shape);
            data[coord_to_index_broadcasted(&coord, shape, &strides)]
        })
        .collect()
}

/// Reduces a gradient computed for a broadcast result back to the shape of
/// the input that was broadcast.
///
/// When broadcasting occurs during a forward pass (e.g., A[2,3] + B[3] -> C[2,3]),
/// the gradient flowing back to B must be summed over every axis that was
/// prepended or expanded from size 1.
pub fn reduce_gradient(grad: &[f32], grad_shape: &[usize], target_shape: &[usize]) -> Vec<f32> {
    if grad_shape == target_shape {
        return grad.to_vec();
    }
    let target_numel: usize = target_shape.iter().product();
    let target_strides = calculate_strides(target_shape);
    let grad_strides = calculate_strides(grad_shape);
    let mut reduced = vec![0.0f32; target_numel];
    for (i, g) in grad.iter().enumerate() {
        let coord = index_to_coord(i, &grad_strides, grad_shape);
        reduced[coord_to_index_broadcasted(&coord, target_shape, &target_strides)] += *g;
    }
    reduced
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
