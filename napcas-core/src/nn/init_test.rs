use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zeros_and_ones_on_parameter() {
    let t = Tensor::ones(&[2, 3]).unwrap().with_requires_grad();
    zeros_(&t);
    assert!(t.get_f32_data().iter().all(|&x| x == 0.0));
    ones_(&t);
    assert!(t.get_f32_data().iter().all(|&x| x == 1.0));
    assert!(t.requires_grad());
}

#[test]
fn test_fan_in_fan_out() {
    assert_eq!(calculate_fan_in_and_fan_out(&[4, 3]).unwrap(), (3, 4));
    assert_eq!(calculate_fan_in_and_fan_out(&[8, 2, 3, 3]).unwrap(), (18, 72));
    assert!(matches!(
        calculate_fan_in_and_fan_out(&[5]),
        Err(NapcasError::ShapeError { .. })
    ));
}

#[test]
fn test_kaiming_uniform_bound() {
    let mut rng = StdRng::seed_from_u64(0);
    let t = Tensor::zeros(&[64, 16]).unwrap();
    kaiming_uniform_(&t, 5.0f32.sqrt(), &mut rng).unwrap();
    let bound = 1.0 / 16.0f32.sqrt();
    let data = t.get_f32_data();
    assert!(data.iter().all(|v| v.abs() <= bound + 1e-6));
    assert!(data.iter().any(|v| v.abs() > bound / 2.0));
}

#[test]
fn test_xavier_uniform_bound() {
    let mut rng = StdRng::seed_from_u64(1);
    let t = Tensor::zeros(&[10, 20]).unwrap();
    xavier_uniform_(&t, 1.0, &mut rng).unwrap();
    let bound = (6.0f32 / 30.0).sqrt();
    assert!(t.get_f32_data().iter().all(|v| v.abs() <= bound + 1e-6));
}

#[test]
fn test_invalid_distribution_parameters() {
    let mut rng = StdRng::seed_from_u64(2);
    let t = Tensor::zeros(&[3]).unwrap();
    assert!(matches!(uniform_(&t, 1.0, 1.0, &mut rng), Err(NapcasError::ConfigurationError(_))));
    assert!(matches!(normal_(&t, 0.0, -1.0, &mut rng), Err(NapcasError::ConfigurationError(_))));
    normal_(&t, 5.0, 0.0, &mut rng).unwrap();
    assert_eq!(t.get_f32_data(), vec![5.0; 3]);
}
