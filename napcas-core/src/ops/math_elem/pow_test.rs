use super::*;
use crate::autograd::grad_check::check_grad;
use crate::ops::math_elem::{exp_op, ln_op, round_op};
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_pow_and_sqrt_forward() {
    let a = create_test_tensor(vec![4.0, 9.0], vec![2]);
    check_tensor_near(&pow_scalar_op(&a, 2.0).unwrap(), &[2], &[16.0, 81.0], 1e-4);
    check_tensor_near(&sqrt_op(&a).unwrap(), &[2], &[2.0, 3.0], 1e-6);
}

#[test]
fn test_pow_backward() {
    let a = create_test_tensor_with_grad(vec![2.0, 3.0], vec![2]);
    pow_scalar_op(&a, 3.0).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[12.0, 27.0], 1e-4);
}

#[test]
fn test_elementwise_math_grad_checks() {
    let x = create_test_tensor_with_grad(vec![0.5, 1.2, 2.0], vec![3]);
    let output_grad = create_test_tensor(vec![1.0, -0.5, 2.0], vec![3]);
    check_grad(|t| sqrt_op(&t[0]), &[x.clone()], &output_grad, 1e-3, 1e-2).unwrap();
    check_grad(|t| exp_op(&t[0]), &[x.clone()], &output_grad, 1e-3, 1e-2).unwrap();
    check_grad(|t| ln_op(&t[0]), &[x], &output_grad, 1e-3, 1e-2).unwrap();
}

#[test]
fn test_round_is_not_differentiable() {
    let a = create_test_tensor_with_grad(vec![0.4, 1.6], vec![2]);
    let r = round_op(&a).unwrap();
    check_tensor_near(&r, &[2], &[0.0, 2.0], 1e-6);
    let err = r.sum().unwrap().backward().unwrap_err();
    assert!(matches!(err, NapcasError::UnsupportedGradient { ref op, .. } if op == "round"));
}
