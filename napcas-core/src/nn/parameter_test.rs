use super::*;

#[test]
fn test_parameter_requires_grad_and_shares_storage() {
    let t = Tensor::new(vec![1.0, 2.0], vec![2]).unwrap();
    let p = Parameter::new(t.clone());
    assert!(p.requires_grad());
    assert!(p.is_leaf());
    assert_eq!(p.tensor(), &t);

    let q = p.clone();
    q.with_data_mut(|d| d[1] = 5.0);
    assert_eq!(t.get_f32_data(), vec![1.0, 5.0]);
    assert_eq!(p, q);
}

#[test]
fn test_parameter_from_operation_output_is_detached() {
    let x = Tensor::new(vec![1.0], vec![1]).unwrap().with_requires_grad();
    let y = x.mul_scalar(2.0).unwrap();
    let p = Parameter::new(y.clone());
    assert!(p.is_leaf());
    assert_ne!(p.tensor(), &y);
    assert_eq!(p.get_f32_data(), vec![2.0]);
}
