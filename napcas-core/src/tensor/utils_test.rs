use super::*;

#[test]
fn test_calculate_strides() {
    assert_eq!(calculate_strides(&[2, 3]), vec![3, 1]);
    assert_eq!(calculate_strides(&[2, 2, 2]), vec![4, 2, 1]);
    assert_eq!(calculate_strides(&[]), Vec::<usize>::new());
}

#[test]
fn test_validate_shape() {
    assert!(validate_shape(&[]).is_ok());
    assert!(validate_shape(&[3, 1]).is_ok());
    assert!(matches!(
        validate_shape(&[2, 0, 3]),
        Err(NapcasError::ShapeError { .. })
    ));
}

#[test]
fn test_broadcast_shapes_compatible() {
    assert_eq!(broadcast_shapes(&[2, 3], &[3]).unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shapes(&[4, 1, 5], &[3, 1]).unwrap(), vec![4, 3, 5]);
    assert_eq!(broadcast_shapes(&[], &[2, 2]).unwrap(), vec![2, 2]);
}

#[test]
fn test_broadcast_shapes_incompatible() {
    let err = broadcast_shapes(&[2, 3], &[4]).unwrap_err();
    assert_eq!(
        err,
        NapcasError::BroadcastError {
            shape1: vec![2, 3],
            shape2: vec![4]
        }
    );
}

#[test]
fn test_index_to_coord() {
    let shape = [2, 3, 4];
    let strides = calculate_strides(&shape);
    assert_eq!(index_to_coord(0, &strides, &shape), vec![0, 0, 0]);
    assert_eq!(index_to_coord(13, &strides, &shape), vec![1, 0, 1]);
    assert_eq!(index_to_coord(23, &strides, &shape), vec![1, 2, 3]);
}

#[test]
fn test_expand_data_row_vector() {
    let expanded = expand_data(&[1.0, 2.0, 3.0], &[3], &[2, 3]);
    assert_eq!(expanded, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
    let expanded_col = expand_data(&[1.0, 2.0], &[2, 1], &[2, 3]);
    assert_eq!(expanded_col, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_reduce_gradient() {
    let grad = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    assert_eq!(reduce_gradient(&grad, &[2, 3], &[3]), vec![5.0, 7.0, 9.0]);
    assert_eq!(reduce_gradient(&grad, &[2, 3], &[2, 1]), vec![6.0, 15.0]);
    assert_eq!(reduce_gradient(&grad, &[2, 3], &[]), vec![21.0]);
    assert_eq!(reduce_gradient(&grad, &[2, 3], &[2, 3]), grad);
}
