use super::*;
use crate::utils::testing::{create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_check_grad_accepts_correct_gradients() {
    let a = create_test_tensor_with_grad(vec![0.5, -1.0, 2.0], vec![3]);
    let b = create_test_tensor_with_grad(vec![1.5, 0.25, -0.75], vec![3]);
    let output_grad = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    check_grad(
        |t| t[0].mul(&t[1])?.tanh(),
        &[a, b],
        &output_grad,
        1e-3,
        1e-2,
    )
    .unwrap();
}

#[test]
fn test_check_grad_detects_missing_path() {
    // Detaching one factor hides half of d(x*x)/dx from the analytic pass.
    let x = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let output_grad = create_test_tensor(vec![1.0, 1.0], vec![2]);
    let result = check_grad(|t| t[0].mul(&t[0].detach()), &[x], &output_grad, 1e-3, 1e-2);
    assert!(matches!(result, Err(GradCheckError::GradientMismatch { input_index: 0, .. })));
}

#[test]
fn test_check_grad_rejects_non_leaf_input() {
    let x = create_test_tensor_with_grad(vec![1.0], vec![1]);
    let y = x.mul_scalar(2.0).unwrap();
    let output_grad = create_test_tensor(vec![1.0], vec![1]);
    let result = check_grad(|t| t[0].exp(), &[y], &output_grad, 1e-3, 1e-2);
    assert_eq!(result, Err(GradCheckError::InputNotLeaf { input_index: 0 }));
}

#[test]
fn test_check_grad_output_grad_shape() {
    let x = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let output_grad = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let result = check_grad(|t| t[0].exp(), &[x], &output_grad, 1e-3, 1e-2);
    assert!(matches!(result, Err(GradCheckError::OutputGradShape { .. })));
}
