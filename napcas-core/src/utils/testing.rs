//! Assertion helpers shared by unit and integration tests.

use crate::tensor::Tensor;
use approx::abs_diff_eq;

/// Asserts that `actual` has `expected_shape` and that every value is within
/// `tolerance` of `expected_data`.
///
/// # Panics
/// Panics with the first offending index on mismatch.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f32],
    tolerance: f32,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    let actual_data = actual.get_f32_data();
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );
    for (i, (a, e)) in actual_data.iter().zip(expected_data).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, tolerance={:?}",
                i, a, e, tolerance
            );
        }
    }
}

/// Asserts that the accumulated gradient of `tensor` matches `expected_data`.
///
/// # Panics
/// Panics if no gradient was accumulated or it differs.
pub fn check_grad_near(tensor: &Tensor, expected_data: &[f32], tolerance: f32) {
    let grad = match tensor.grad() {
        Some(grad) => grad,
        None => panic!("Tensor has no gradient"),
    };
    check_tensor_near(&grad, &tensor.shape(), expected_data, tolerance);
}

/// Creates a leaf tensor for tests.
#[cfg(test)]
pub(crate) fn create_test_tensor(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Creates a leaf tensor that requires grad for tests.
#[cfg(test)]
pub(crate) fn create_test_tensor_with_grad(data: Vec<f32>, shape: Vec<usize>) -> Tensor {
    create_test_tensor(data, shape).with_requires_grad()
}
