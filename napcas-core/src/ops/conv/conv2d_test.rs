use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

fn ramp(len: usize, scale: f32) -> Vec<f32> {
    (0..len).map(|i| ((i * 7 % 11) as f32 - 5.0) * scale).collect()
}

#[test]
fn test_conv2d_forward_valid() {
    let x = create_test_tensor((1..=9).map(|v| v as f32).collect(), vec![1, 1, 3, 3]);
    let w = create_test_tensor(vec![1.0; 4], vec![1, 1, 2, 2]);
    let b = create_test_tensor(vec![0.5], vec![1]);
    let y = conv2d_op(&x, &w, Some(&b), 1, 0).unwrap();
    check_tensor_near(&y, &[1, 1, 2, 2], &[12.5, 16.5, 24.5, 28.5], 1e-5);
}

#[test]
fn test_conv2d_forward_padding_and_stride() {
    let x = create_test_tensor((1..=9).map(|v| v as f32).collect(), vec![1, 1, 3, 3]);
    let w = create_test_tensor(vec![1.0; 9], vec![1, 1, 3, 3]);
    let same = conv2d_op(&x, &w, None, 1, 1).unwrap();
    assert_eq!(same.shape(), vec![1, 1, 3, 3]);
    assert_eq!(same.at(&[0, 0, 1, 1]).unwrap(), 45.0);
    assert_eq!(same.at(&[0, 0, 0, 0]).unwrap(), 12.0);
    let strided = conv2d_op(&x, &w, None, 2, 1).unwrap();
    check_tensor_near(&strided, &[1, 1, 2, 2], &[12.0, 16.0, 24.0, 28.0], 1e-5);
}

#[test]
fn test_conv2d_errors() {
    let x = create_test_tensor(vec![0.0; 18], vec![1, 2, 3, 3]);
    let w = create_test_tensor(vec![0.0; 4], vec![1, 1, 2, 2]);
    assert!(matches!(conv2d_op(&x, &w, None, 1, 0), Err(NapcasError::ShapeMismatch { .. })));

    let w = create_test_tensor(vec![0.0; 8], vec![1, 2, 2, 2]);
    assert!(matches!(conv2d_op(&x, &w, None, 0, 0), Err(NapcasError::ConfigurationError(_))));
    let bad_bias = create_test_tensor(vec![0.0; 2], vec![2]);
    assert!(matches!(
        conv2d_op(&x, &w, Some(&bad_bias), 1, 0),
        Err(NapcasError::ShapeMismatch { .. })
    ));
    let flat = create_test_tensor(vec![0.0; 9], vec![3, 3]);
    assert!(matches!(conv2d_op(&flat, &w, None, 1, 0), Err(NapcasError::ShapeMismatch { .. })));
}

#[test]
fn test_conv2d_backward_bias_counts_positions() {
    let x = create_test_tensor((1..=9).map(|v| v as f32).collect(), vec![1, 1, 3, 3]);
    let w = create_test_tensor_with_grad(vec![1.0; 4], vec![1, 1, 2, 2]);
    let b = create_test_tensor_with_grad(vec![0.0], vec![1]);
    conv2d_op(&x, &w, Some(&b), 1, 0).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&b, &[4.0], 1e-6);
    // Each tap sums the four input values it slides over.
    check_grad_near(&w, &[12.0, 16.0, 24.0, 28.0], 1e-5);
}

#[test]
fn test_conv2d_grad_check() {
    let x = create_test_tensor_with_grad(ramp(2 * 2 * 4 * 4, 0.1), vec![2, 2, 4, 4]);
    let w = create_test_tensor_with_grad(ramp(3 * 2 * 3 * 3, 0.05), vec![3, 2, 3, 3]);
    let b = create_test_tensor_with_grad(vec![0.1, -0.2, 0.3], vec![3]);
    let output_grad = create_test_tensor(ramp(2 * 3 * 2 * 2, 0.3), vec![2, 3, 2, 2]);
    check_grad(
        |t| conv2d_op(&t[0], &t[1], Some(&t[2]), 2, 1),
        &[x, w, b],
        &output_grad,
        1e-3,
        1e-2,
    )
    .unwrap();
}
