use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};
use approx::assert_relative_eq;

#[test]
fn test_softmax_rows_sum_to_one() {
    let x = create_test_tensor(vec![1.0, 2.0, 3.0, 1000.0, 1000.0, 1000.0], vec![2, 3]);
    let y = softmax_op(&x, 1).unwrap();
    let data = y.get_f32_data();
    assert_relative_eq!(data[..3].iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(data[0], 0.090_030_57, epsilon = 1e-6);
    check_tensor_near(&y.narrow(0, 1, 1).unwrap(), &[1, 3], &[1.0 / 3.0; 3], 1e-6);
}

#[test]
fn test_softmax_along_first_axis() {
    let x = create_test_tensor(vec![0.0, 5.0, 0.0, 5.0], vec![2, 2]);
    let y = softmax_op(&x, 0).unwrap();
    check_tensor_near(&y, &[2, 2], &[0.5, 0.5, 0.5, 0.5], 1e-6);
}

#[test]
fn test_softmax_invalid_axis() {
    let x = create_test_tensor(vec![0.0, 1.0], vec![2]);
    assert!(matches!(softmax_op(&x, 1), Err(NapcasError::InvalidDimension { dim: 1, rank: 1 })));
}

#[test]
fn test_softmax_grad_check() {
    let x = create_test_tensor_with_grad(vec![0.2, -0.5, 1.0, 0.3, 0.1, -1.2], vec![2, 3]);
    let output_grad = create_test_tensor(vec![1.0, 0.0, -2.0, 0.5, 1.5, 1.0], vec![2, 3]);
    check_grad(|t| softmax_op(&t[0], 1), &[x.clone()], &output_grad, 1e-3, 1e-2).unwrap();
    check_grad(|t| softmax_op(&t[0], 0), &[x], &output_grad, 1e-3, 1e-2).unwrap();
}
