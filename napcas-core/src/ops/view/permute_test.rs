use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_permute_3d() {
    let a = create_test_tensor((0..24).map(|v| v as f32).collect(), vec![2, 3, 4]);
    let p = permute_op(&a, &[2, 0, 1]).unwrap();
    assert_eq!(p.shape(), vec![4, 2, 3]);
    // p[i, j, k] = a[j, k, i]
    assert_eq!(p.at(&[1, 0, 2]).unwrap(), a.at(&[0, 2, 1]).unwrap());
    assert_eq!(p.at(&[3, 1, 0]).unwrap(), a.at(&[1, 0, 3]).unwrap());
}

#[test]
fn test_transpose_2d() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    check_tensor_near(&transpose_op(&a, 0, 1).unwrap(), &[3, 2], &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0], 1e-6);
}

#[test]
fn test_permute_rejects_non_permutation() {
    let a = create_test_tensor(vec![0.0; 6], vec![2, 3]);
    assert!(matches!(permute_op(&a, &[0, 0]), Err(NapcasError::ShapeError { .. })));
    assert!(matches!(permute_op(&a, &[0, 2]), Err(NapcasError::InvalidDimension { .. })));
}

#[test]
fn test_permute_grad_check() {
    let a = create_test_tensor_with_grad((0..12).map(|v| v as f32 * 0.1).collect(), vec![2, 3, 2]);
    let output_grad = create_test_tensor((0..12).map(|v| v as f32).collect(), vec![3, 2, 2]);
    check_grad(|t| permute_op(&t[0], &[1, 2, 0]), &[a], &output_grad, 1e-3, 1e-2).unwrap();
}
