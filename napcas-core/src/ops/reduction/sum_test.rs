use super::*;
use crate::ops::reduction::argmax_op;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_sum_all_is_scalar() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let s = sum_op(&a).unwrap();
    assert_eq!(s.shape(), Vec::<usize>::new());
    assert_eq!(s.item().unwrap(), 10.0);
}

#[test]
fn test_sum_axis_keep_dim() {
    let a = create_test_tensor((1..=6).map(|v| v as f32).collect(), vec![2, 3]);
    check_tensor_near(&sum_axis_op(&a, 0, false).unwrap(), &[3], &[5.0, 7.0, 9.0], 1e-6);
    check_tensor_near(&sum_axis_op(&a, 1, true).unwrap(), &[2, 1], &[6.0, 15.0], 1e-6);
    assert!(matches!(sum_axis_op(&a, 2, false), Err(NapcasError::InvalidDimension { .. })));
}

#[test]
fn test_sum_axis_backward() {
    let a = create_test_tensor_with_grad((1..=6).map(|v| v as f32).collect(), vec![2, 3]);
    let w = create_test_tensor(vec![1.0, 10.0], vec![2]);
    sum_axis_op(&a, 1, false).unwrap().mul(&w).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[1.0, 1.0, 1.0, 10.0, 10.0, 10.0], 1e-6);
}

#[test]
fn test_argmax_is_not_differentiable() {
    let a = create_test_tensor_with_grad(vec![1.0, 5.0, 2.0, 7.0, 0.0, 7.0], vec![2, 3]);
    let idx = argmax_op(&a, 1).unwrap();
    check_tensor_near(&idx, &[2], &[1.0, 0.0], 1e-6);
    let err = idx.sum().unwrap().backward().unwrap_err();
    assert!(matches!(err, NapcasError::UnsupportedGradient { .. }));
    assert!(a.grad().is_none());
}
