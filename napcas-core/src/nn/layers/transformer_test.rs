use super::*;
use crate::utils::testing::check_tensor_near;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn small_config() -> TransformerConfig {
    TransformerConfig {
        d_model: 8,
        num_heads: 2,
        num_layers: 2,
        d_ff: 16,
        max_len: 10,
    }
}

#[test]
fn test_transformer_config_validation() {
    assert!(TransformerConfig::default().validate().is_ok());
    let bad_heads = TransformerConfig { num_heads: 3, ..small_config() };
    assert!(matches!(bad_heads.validate(), Err(NapcasError::ConfigurationError(_))));
    let no_layers = TransformerConfig { num_layers: 0, ..small_config() };
    assert!(no_layers.validate().is_err());
    let mut rng = StdRng::seed_from_u64(0);
    assert!(Transformer::new(bad_heads, &mut rng).is_err());
}

#[test]
fn test_transformer_config_from_json() {
    let config: TransformerConfig =
        serde_json::from_str(r#"{"d_model": 8, "num_heads": 2, "d_ff": 16}"#).unwrap();
    assert_eq!(config.num_layers, TransformerConfig::default().num_layers);
    assert_eq!(config.d_ff, 16);
    let back: TransformerConfig = serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_positional_encoding_values() {
    let pe = positional_encoding(2, 4).unwrap();
    assert_eq!(pe.shape(), vec![2, 1, 4]);
    check_tensor_near(
        &pe,
        &[2, 1, 4],
        &[
            0.0,
            1.0,
            0.0,
            1.0,
            1.0f32.sin(),
            0.01f32.cos(),
            1e-4f32.sin(),
            1e-6f32.cos(),
        ],
        1e-6,
    );
}

#[test]
fn test_transformer_forward_shape_and_names() {
    let mut rng = StdRng::seed_from_u64(21);
    let model = Transformer::new(small_config(), &mut rng).unwrap();
    let x = Tensor::ones(&[5, 2, 8]).unwrap();
    assert_eq!(model.forward(&x).unwrap().shape(), vec![5, 2, 8]);

    let names: Vec<String> = model.named_parameters().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names[0], "layers.0.attention.q_proj.weight");
    assert!(names.contains(&"layers.1.ff2.bias".to_string()));
    let per_layer = 4 * (8 * 8 + 8) + (8 * 16 + 16) + (16 * 8 + 8);
    assert_eq!(model.num_parameters(), 2 * per_layer);
}

#[test]
fn test_transformer_rejects_long_sequence() {
    let mut rng = StdRng::seed_from_u64(21);
    let model = Transformer::new(small_config(), &mut rng).unwrap();
    let x = Tensor::ones(&[11, 1, 8]).unwrap();
    assert!(matches!(model.forward(&x), Err(NapcasError::ShapeMismatch { .. })));
    let x = Tensor::ones(&[4, 1, 6]).unwrap();
    assert!(matches!(model.forward(&x), Err(NapcasError::ShapeMismatch { .. })));
}

#[test]
fn test_transformer_backward_reaches_every_parameter() {
    let mut rng = StdRng::seed_from_u64(4);
    let model = Transformer::new(small_config(), &mut rng).unwrap();
    let x = crate::tensor::randn(&[3, 2, 8], 0.0, 1.0, &mut rng).unwrap();
    model.forward(&x).unwrap().mean().unwrap().backward().unwrap();
    for (name, p) in model.named_parameters() {
        assert!(p.grad().is_some(), "{} has no gradient", name);
    }
}
