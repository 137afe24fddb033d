use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_sub_forward() {
    let a = create_test_tensor(vec![5.0, 7.0], vec![2]);
    let b = create_test_tensor(vec![1.0, 10.0], vec![2]);
    check_tensor_near(&sub_op(&a, &b).unwrap(), &[2], &[4.0, -3.0], 1e-6);
}

#[test]
fn test_sub_backward_negates_rhs() {
    let a = create_test_tensor_with_grad(vec![5.0, 7.0], vec![2]);
    let b = create_test_tensor_with_grad(vec![1.0], vec![1]);
    sub_op(&a, &b).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[1.0, 1.0], 1e-6);
    check_grad_near(&b, &[-2.0], 1e-6);
}

#[test]
fn test_sub_grad_check() {
    let a = create_test_tensor_with_grad(vec![0.5, -1.0, 2.0, 0.3], vec![2, 2]);
    let b = create_test_tensor_with_grad(vec![0.1, 0.9], vec![2]);
    let output_grad = create_test_tensor(vec![1.0, -1.0, 0.5, 2.0], vec![2, 2]);
    check_grad(|x| sub_op(&x[0], &x[1]), &[a, b], &output_grad, 1e-3, 1e-2).unwrap();
}
