use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zeros_and_ones() -> Result<(), NapcasError> {
    let z = zeros(&[2, 3])?;
    assert_eq!(z.shape(), vec![2, 3]);
    assert!(z.get_f32_data().iter().all(|&x| x == 0.0));
    let o = ones(&[4])?;
    assert_eq!(o.get_f32_data(), vec![1.0; 4]);
    assert!(!o.requires_grad());
    assert!(o.is_leaf());
    Ok(())
}

#[test]
fn test_full_rejects_zero_dimension() {
    let result = full(&[3, 0], 1.5);
    assert!(matches!(result, Err(NapcasError::ShapeError { .. })));
}

#[test]
fn test_scalar_has_empty_shape() -> Result<(), NapcasError> {
    let s = scalar(2.5);
    assert_eq!(s.shape(), Vec::<usize>::new());
    assert_eq!(s.rank(), 0);
    assert_eq!(s.item()?, 2.5);
    Ok(())
}

#[test]
fn test_randn_is_seeded_and_centered() -> Result<(), NapcasError> {
    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);
    let a = randn(&[1000], 0.0, 1.0, &mut rng_a)?;
    let b = randn(&[1000], 0.0, 1.0, &mut rng_b)?;
    assert_eq!(a.get_f32_data(), b.get_f32_data());
    let mean: f32 = a.get_f32_data().iter().sum::<f32>() / 1000.0;
    assert!(mean.abs() < 0.15, "sample mean too far from 0: {}", mean);
    Ok(())
}

#[test]
fn test_rand_uniform_range() -> Result<(), NapcasError> {
    let mut rng = StdRng::seed_from_u64(3);
    let t = rand_uniform(&[10, 10], -0.5, 0.5, &mut rng)?;
    assert!(t.get_f32_data().iter().all(|&x| (-0.5..0.5).contains(&x)));
    assert!(matches!(
        rand_uniform(&[2], 1.0, 1.0, &mut rng),
        Err(NapcasError::ConfigurationError(_))
    ));
    Ok(())
}

#[test]
fn test_one_hot() -> Result<(), NapcasError> {
    let t = one_hot(&[2, 0], 3)?;
    assert_eq!(t.shape(), vec![2, 3]);
    assert_eq!(t.get_f32_data(), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    assert!(matches!(
        one_hot(&[3], 3),
        Err(NapcasError::IndexOutOfBounds { .. })
    ));
    Ok(())
}
