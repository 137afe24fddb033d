use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_mean_all_and_axis() {
    let a = create_test_tensor((1..=6).map(|v| v as f32).collect(), vec![2, 3]);
    assert_eq!(mean_op(&a).unwrap().item().unwrap(), 3.5);
    check_tensor_near(&mean_axis_op(&a, 0, false).unwrap(), &[3], &[2.5, 3.5, 4.5], 1e-6);
    check_tensor_near(&mean_axis_op(&a, 1, true).unwrap(), &[2, 1], &[2.0, 5.0], 1e-6);
}

#[test]
fn test_mean_backward_spreads_evenly() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![4]);
    mean_op(&a).unwrap().backward().unwrap();
    check_grad_near(&a, &[0.25; 4], 1e-6);
}

#[test]
fn test_mean_axis_grad_check() {
    let a = create_test_tensor_with_grad(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6], vec![3, 2]);
    let output_grad = create_test_tensor(vec![1.0, -2.0, 3.0], vec![3]);
    check_grad(|t| mean_axis_op(&t[0], 1, false), &[a], &output_grad, 1e-3, 1e-2).unwrap();
}
