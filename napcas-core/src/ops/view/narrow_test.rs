use super::*;
use crate::utils::testing::{check_grad_near, check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_narrow_middle_axis() {
    let a = create_test_tensor((0..12).map(|v| v as f32).collect(), vec![2, 3, 2]);
    let n = narrow_op(&a, 1, 1, 2).unwrap();
    check_tensor_near(&n, &[2, 2, 2], &[2.0, 3.0, 4.0, 5.0, 8.0, 9.0, 10.0, 11.0], 1e-6);
}

#[test]
fn test_narrow_out_of_range() {
    let a = create_test_tensor(vec![0.0; 4], vec![4]);
    assert!(matches!(narrow_op(&a, 0, 3, 2), Err(NapcasError::IndexOutOfBounds { .. })));
    assert!(matches!(narrow_op(&a, 0, 0, 0), Err(NapcasError::IndexOutOfBounds { .. })));
}

#[test]
fn test_narrow_backward_scatters() {
    let a = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    narrow_op(&a, 1, 2, 1).unwrap().sum().unwrap().backward().unwrap();
    check_grad_near(&a, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0], 1e-6);
}
