use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_add_same_shape() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_tensor(vec![10.0, 20.0, 30.0], vec![3]);
    let c = add_op(&a, &b).unwrap();
    check_tensor_near(&c, &[3], &[11.0, 22.0, 33.0], 1e-6);
    assert!(!c.requires_grad());
    assert!(c.is_leaf());
}

#[test]
fn test_add_broadcast_row() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let b = create_test_tensor(vec![10.0, 20.0, 30.0], vec![3]);
    let c = add_op(&a, &b).unwrap();
    check_tensor_near(&c, &[2, 3], &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0], 1e-6);
}

#[test]
fn test_add_incompatible_shapes() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let b = create_test_tensor(vec![1.0, 2.0], vec![2]);
    assert!(matches!(add_op(&a, &b), Err(NapcasError::BroadcastError { .. })));
}

#[test]
fn test_add_backward_reduces_broadcast() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let b = create_test_tensor_with_grad(vec![1.0, 1.0, 1.0], vec![3]);
    add_op(&a, &b).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[1.0; 6], 1e-6);
    check_grad_near(&b, &[2.0, 2.0, 2.0], 1e-6);
}

#[test]
fn test_add_same_tensor_twice() {
    let a = create_test_tensor_with_grad(vec![1.0, -2.0], vec![2]);
    add_op(&a, &a).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[2.0, 2.0], 1e-6);
}

#[test]
fn test_add_grad_check_broadcast_column() {
    let a = create_test_tensor_with_grad(vec![0.5, -1.0, 2.0, 0.3, 0.7, -0.2], vec![2, 3]);
    let b = create_test_tensor_with_grad(vec![0.1, -0.4], vec![2, 1]);
    let output_grad = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    check_grad(|x| add_op(&x[0], &x[1]), &[a, b], &output_grad, 1e-3, 1e-2).unwrap();
}
