use napcas_core::tensor::{one_hot, zeros_like};
use napcas_core::{NapcasError, Tensor};

mod common;
use common::create_test_tensor;

#[test]
fn creation_validates_shape_and_length() {
    assert!(matches!(
        Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]),
        Err(NapcasError::TensorCreationError { .. })
    ));
    assert!(matches!(Tensor::zeros(&[2, 0]), Err(NapcasError::ShapeError { .. })));
    let s = Tensor::scalar(4.0);
    assert_eq!(s.rank(), 0);
    assert_eq!(s.item().unwrap(), 4.0);
}

#[test]
fn handles_share_storage_and_compare_by_identity() {
    let a = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let b = a.clone();
    let c = create_test_tensor(vec![1.0, 2.0], vec![2]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    b.with_data_mut(|d| d[0] = 9.0);
    assert_eq!(a.at(&[0]).unwrap(), 9.0);
    assert!(matches!(a.at(&[2]), Err(NapcasError::IndexOutOfBounds { .. })));
    assert_eq!(zeros_like(&a).get_f32_data(), vec![0.0, 0.0]);
}

#[test]
fn broadcasting_and_reductions() {
    let m = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]);
    let row = create_test_tensor(vec![10.0, 20.0, 30.0], vec![3]);
    let sum = m.add(&row).unwrap();
    assert_eq!(sum.get_f32_data(), vec![11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    assert_eq!(m.sum_axis(0, false).unwrap().get_f32_data(), vec![5.0, 7.0, 9.0]);
    assert_eq!(m.mean_axis(1, true).unwrap().shape(), vec![2, 1]);
    assert!(matches!(
        m.add(&create_test_tensor(vec![1.0, 2.0], vec![2])),
        Err(NapcasError::BroadcastError { .. })
    ));
}

#[test]
fn views_compose() {
    let t = create_test_tensor((0..24).map(|v| v as f32).collect(), vec![2, 3, 4]);
    let p = t.permute(&[2, 0, 1]).unwrap();
    assert_eq!(p.shape(), vec![4, 2, 3]);
    assert_eq!(p.at(&[1, 1, 2]).unwrap(), t.at(&[1, 2, 1]).unwrap());
    let n = t.narrow(2, 1, 2).unwrap();
    assert_eq!(n.shape(), vec![2, 3, 2]);
    assert_eq!(n.at(&[0, 0, 0]).unwrap(), 1.0);
    let parts = [t.clone(), t.clone()];
    assert_eq!(Tensor::stack(&parts, 0).unwrap().shape(), vec![2, 2, 3, 4]);
    assert_eq!(Tensor::concat(&parts, 1).unwrap().shape(), vec![2, 6, 4]);
    assert_eq!(t.flatten(1).unwrap().shape(), vec![2, 12]);
}

#[test]
fn one_hot_rows() {
    let t = one_hot(&[2, 0], 3).unwrap();
    assert_eq!(t.shape(), vec![2, 3]);
    assert_eq!(t.get_f32_data(), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    assert!(one_hot(&[3], 3).is_err());
}
