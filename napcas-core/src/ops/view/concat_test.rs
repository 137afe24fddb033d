use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_concat_along_last_axis() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let b = create_test_tensor(vec![5.0, 6.0], vec![2, 1]);
    let c = concat_op(&[a, b], 1).unwrap();
    check_tensor_near(&c, &[2, 3], &[1.0, 2.0, 5.0, 3.0, 4.0, 6.0], 1e-6);
}

#[test]
fn test_concat_errors() {
    let a = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let b = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    assert!(matches!(concat_op(&[], 0), Err(NapcasError::ShapeError { .. })));
    assert!(matches!(concat_op(&[a.clone(), b], 0), Err(NapcasError::ShapeMismatch { .. })));
    assert!(matches!(concat_op(&[a], 1), Err(NapcasError::InvalidDimension { .. })));
}

#[test]
fn test_stack_new_axis() {
    let a = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let b = create_test_tensor(vec![3.0, 4.0], vec![2]);
    check_tensor_near(&stack_op(&[a.clone(), b.clone()], 0).unwrap(), &[2, 2], &[1.0, 2.0, 3.0, 4.0], 1e-6);
    check_tensor_near(&stack_op(&[a, b], 1).unwrap(), &[2, 2], &[1.0, 3.0, 2.0, 4.0], 1e-6);
}

#[test]
fn test_concat_same_tensor_accumulates() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
    let c = concat_op(&[a.clone(), a.clone()], 0).unwrap();
    let w = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![4]);
    c.mul(&w).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[4.0, 6.0], 1e-6);
}

#[test]
fn test_stack_grad_check() {
    let a = create_test_tensor_with_grad(vec![0.1, 0.2, 0.3], vec![3]);
    let b = create_test_tensor_with_grad(vec![-0.4, 0.5, 0.6], vec![3]);
    let output_grad = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![3, 2]);
    check_grad(|t| stack_op(t, 1), &[a, b], &output_grad, 1e-3, 1e-2).unwrap();
}
