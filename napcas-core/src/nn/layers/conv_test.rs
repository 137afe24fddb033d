use super::*;
use crate::utils::testing::{check_tensor_near, create_test_tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_conv2d_config_defaults_and_validation() {
    let config = Conv2dConfig::default();
    assert_eq!(config.stride, 1);
    assert_eq!(config.padding, 0);
    assert!(config.bias);

    let bad = Conv2dConfig { stride: 0, ..config };
    assert!(matches!(bad.validate(), Err(NapcasError::ConfigurationError(_))));
    let mut rng = StdRng::seed_from_u64(0);
    assert!(Conv2d::new(1, 1, 3, bad, &mut rng).is_err());
}

#[test]
fn test_conv2d_config_from_json() {
    let config: Conv2dConfig = serde_json::from_str(r#"{"padding": 1}"#).unwrap();
    assert_eq!(config, Conv2dConfig { stride: 1, padding: 1, bias: true });
}

#[test]
fn test_conv2d_layer_output_shape() {
    let mut rng = StdRng::seed_from_u64(3);
    let config = Conv2dConfig { stride: 2, padding: 1, bias: true };
    let conv = Conv2d::new(2, 4, 3, config, &mut rng).unwrap();
    assert_eq!(conv.weight().shape(), vec![4, 2, 3, 3]);
    assert_eq!(conv.bias().unwrap().shape(), vec![4]);
    assert_eq!(conv.num_parameters(), 4 * 2 * 9 + 4);

    let x = Tensor::zeros(&[1, 2, 5, 5]).unwrap();
    let y = conv.forward(&x).unwrap();
    assert_eq!(y.shape(), vec![1, 4, 3, 3]);
}

#[test]
fn test_conv2d_layer_without_bias_is_linear_in_input() {
    let mut rng = StdRng::seed_from_u64(11);
    let config = Conv2dConfig { bias: false, ..Default::default() };
    let conv = Conv2d::new(1, 1, 2, config, &mut rng).unwrap();
    assert_eq!(conv.named_parameters().len(), 1);
    conv.weight().with_data_mut(|w| w.copy_from_slice(&[1.0, 0.0, 0.0, 1.0]));

    let x = create_test_tensor((1..=9).map(|v| v as f32).collect(), vec![1, 1, 3, 3]);
    let y = conv.forward(&x).unwrap();
    check_tensor_near(&y, &[1, 1, 2, 2], &[6.0, 8.0, 12.0, 14.0], 1e-6);
}
