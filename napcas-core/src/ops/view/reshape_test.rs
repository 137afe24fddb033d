use super::*;
use crate::utils::testing::{check_grad_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_reshape_preserves_data() {
    let a = create_test_tensor((0..6).map(|v| v as f32).collect(), vec![2, 3]);
    let r = reshape_op(&a, &[3, 1, 2]).unwrap();
    assert_eq!(r.shape(), vec![3, 1, 2]);
    assert_eq!(r.get_f32_data(), a.get_f32_data());
}

#[test]
fn test_reshape_wrong_count() {
    let a = create_test_tensor(vec![0.0; 6], vec![2, 3]);
    assert!(matches!(reshape_op(&a, &[4]), Err(NapcasError::ShapeMismatch { .. })));
    assert!(matches!(reshape_op(&a, &[6, 0]), Err(NapcasError::ShapeError { .. })));
}

#[test]
fn test_reshape_backward_restores_shape() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let r = reshape_op(&a, &[4]).unwrap();
    r.mul(&r).unwrap().sum().unwrap().backward().unwrap();
    assert_eq!(a.grad().unwrap().shape(), vec![2, 2]);
    check_grad_near(&a, &[2.0, 4.0, 6.0, 8.0], 1e-6);
}
