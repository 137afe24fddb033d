use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_div_forward() {
    let a = create_test_tensor(vec![6.0, 1.0], vec![2]);
    let b = create_test_tensor(vec![3.0, 4.0], vec![2]);
    check_tensor_near(&div_op(&a, &b).unwrap(), &[2], &[2.0, 0.25], 1e-6);
}

#[test]
fn test_div_backward_values() {
    let a = create_test_tensor_with_grad(vec![6.0], vec![1]);
    let b = create_test_tensor_with_grad(vec![3.0], vec![1]);
    div_op(&a, &b).unwrap().sum().unwrap().backward().unwrap();
    // d(a/b)/da = 1/b, d(a/b)/db = -a/b^2
    check_grad_near(&a, &[1.0 / 3.0], 1e-6);
    check_grad_near(&b, &[-6.0 / 9.0], 1e-6);
}

#[test]
fn test_div_grad_check_broadcast() {
    let a = create_test_tensor_with_grad(vec![0.5, -1.0, 2.0, 0.3], vec![2, 2]);
    let b = create_test_tensor_with_grad(vec![1.5, 2.5], vec![2]);
    let output_grad = create_test_tensor(vec![1.0, 1.0, 1.0, 1.0], vec![2, 2]);
    check_grad(|x| div_op(&x[0], &x[1]), &[a, b], &output_grad, 1e-3, 1e-2).unwrap();
}
