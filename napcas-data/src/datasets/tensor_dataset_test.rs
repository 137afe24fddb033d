use super::*;

fn dataset() -> TensorDataset {
    let inputs = Tensor::new((0..6).map(|v| v as f32).collect(), vec![3, 2]).unwrap();
    let targets = Tensor::new(vec![10.0, 20.0, 30.0], vec![3]).unwrap();
    TensorDataset::new(inputs, targets).unwrap()
}

#[test]
fn test_tensor_dataset_len_and_get() {
    let ds = dataset();
    assert_eq!(ds.len(), 3);
    assert!(!ds.is_empty());
    let (x, y) = ds.get(1).unwrap();
    assert_eq!(x.shape(), vec![2]);
    assert_eq!(x.get_f32_data(), vec![2.0, 3.0]);
    assert_eq!(y.shape(), Vec::<usize>::new());
    assert_eq!(y.item().unwrap(), 20.0);
}

#[test]
fn test_tensor_dataset_out_of_bounds() {
    assert!(matches!(
        dataset().get(3),
        Err(NapcasError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn test_tensor_dataset_leading_dims_must_match() {
    let inputs = Tensor::zeros(&[3, 2]).unwrap();
    let targets = Tensor::zeros(&[4]).unwrap();
    assert!(matches!(
        TensorDataset::new(inputs, targets),
        Err(NapcasError::ShapeMismatch { .. })
    ));
    let scalar = Tensor::scalar(1.0);
    assert!(TensorDataset::new(scalar, Tensor::zeros(&[1]).unwrap()).is_err());
}

#[test]
fn test_tensor_dataset_samples_are_detached() {
    let inputs = Tensor::zeros(&[2, 2]).unwrap().with_requires_grad();
    let ds = TensorDataset::new(inputs, Tensor::zeros(&[2]).unwrap()).unwrap();
    let (x, _) = ds.get(0).unwrap();
    assert!(x.is_leaf());
    assert!(!x.requires_grad());
}
