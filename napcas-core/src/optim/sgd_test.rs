use super::*;
use crate::autograd::live_node_count;
use crate::tensor::Tensor;
use crate::utils::testing::check_tensor_near;

/// A parameter whose gradient is `grad` everywhere.
fn param_with_grad(data: Vec<f32>, grad: f32) -> Parameter {
    let n = data.len();
    let p = Parameter::new(Tensor::new(data, vec![n]).unwrap());
    p.mul_scalar(grad).unwrap().sum().unwrap().backward().unwrap();
    p
}

fn sgd(params: &[&Parameter], config: SgdConfig) -> Sgd {
    let named = params
        .iter()
        .enumerate()
        .map(|(i, p)| (format!("p{}", i), (*p).clone()))
        .collect();
    Sgd::new(named, config).unwrap()
}

#[test]
fn test_sgd_plain_step() {
    let p = param_with_grad(vec![1.0, 2.0], 3.0);
    let mut opt = sgd(&[&p], SgdConfig { lr: 0.1, ..Default::default() });
    opt.step().unwrap();
    check_tensor_near(&p, &[2], &[0.7, 1.7], 1e-6);
}

#[test]
fn test_sgd_momentum_accumulates() {
    let p = param_with_grad(vec![0.0], 1.0);
    let mut opt = sgd(&[&p], SgdConfig { lr: 0.1, momentum: 0.9, ..Default::default() });
    opt.step().unwrap();
    check_tensor_near(&p, &[1], &[-0.1], 1e-6);
    opt.step().unwrap();
    check_tensor_near(&p, &[1], &[-0.29], 1e-6);
}

#[test]
fn test_sgd_nesterov() {
    let p = param_with_grad(vec![0.0], 1.0);
    let config = SgdConfig { lr: 0.1, momentum: 0.9, nesterov: true, ..Default::default() };
    let mut opt = sgd(&[&p], config);
    opt.step().unwrap();
    check_tensor_near(&p, &[1], &[-0.19], 1e-6);
}

#[test]
fn test_sgd_weight_decay() {
    let p = param_with_grad(vec![2.0], 1.0);
    let mut opt = sgd(&[&p], SgdConfig { lr: 0.1, weight_decay: 0.5, ..Default::default() });
    opt.step().unwrap();
    check_tensor_near(&p, &[1], &[1.8], 1e-6);
}

#[test]
fn test_sgd_skips_parameters_without_grad() {
    let with_grad = param_with_grad(vec![1.0], 1.0);
    let without = Parameter::new(Tensor::new(vec![5.0], vec![1]).unwrap());
    let mut opt = sgd(&[&with_grad, &without], SgdConfig { lr: 0.5, ..Default::default() });
    opt.step().unwrap();
    check_tensor_near(&with_grad, &[1], &[0.5], 1e-6);
    check_tensor_near(&without, &[1], &[5.0], 1e-6);
}

#[test]
fn test_sgd_step_param() {
    let a = param_with_grad(vec![1.0], 1.0);
    let b = param_with_grad(vec![1.0], 1.0);
    let mut opt = sgd(&[&a, &b], SgdConfig { lr: 0.5, ..Default::default() });
    opt.step_param(&b).unwrap();
    check_tensor_near(&a, &[1], &[1.0], 1e-6);
    check_tensor_near(&b, &[1], &[0.5], 1e-6);

    let stranger = param_with_grad(vec![1.0], 1.0);
    assert!(matches!(opt.step_param(&stranger), Err(NapcasError::OptimizerState(_))));
}

#[test]
fn test_sgd_step_records_no_graph() {
    let p = param_with_grad(vec![1.0, 2.0, 3.0], 1.0);
    let before = live_node_count();
    let mut opt = sgd(&[&p], SgdConfig { lr: 0.1, momentum: 0.5, ..Default::default() });
    opt.step().unwrap();
    assert_eq!(live_node_count(), before);
    assert!(p.is_leaf());
}

#[test]
fn test_sgd_zero_grad_and_learning_rate() {
    let p = param_with_grad(vec![1.0], 4.0);
    let mut opt = sgd(&[&p], SgdConfig::default());
    opt.zero_grad();
    assert!(p.grad().map_or(true, |g| g.get_f32_data() == vec![0.0]));
    assert_eq!(opt.learning_rate(), 0.01);
    opt.set_learning_rate(0.5);
    assert_eq!(opt.learning_rate(), 0.5);
}

#[test]
fn test_sgd_config_validation() {
    let negative = SgdConfig { lr: -1.0, ..Default::default() };
    assert!(matches!(negative.validate(), Err(NapcasError::ConfigurationError(_))));
    let nesterov = SgdConfig { nesterov: true, ..Default::default() };
    assert!(nesterov.validate().is_err());
    assert!(SgdConfig::default().validate().is_ok());
}

#[test]
fn test_sgd_rejects_duplicate_registration() {
    let p = param_with_grad(vec![1.0], 1.0);
    let twice = vec![("a".to_string(), p.clone()), ("b".to_string(), p.clone())];
    assert!(matches!(Sgd::new(twice, SgdConfig::default()), Err(NapcasError::OptimizerState(_))));
    let q = param_with_grad(vec![1.0], 1.0);
    let same_name = vec![("a".to_string(), p), ("a".to_string(), q)];
    assert!(Sgd::new(same_name, SgdConfig::default()).is_err());
}

#[test]
fn test_sgd_state_dict_resumes_momentum() {
    let config = SgdConfig { lr: 0.1, momentum: 0.9, ..Default::default() };
    let reference = param_with_grad(vec![0.0], 1.0);
    let mut reference_opt = sgd(&[&reference], config);
    reference_opt.step().unwrap();
    reference_opt.step().unwrap();

    let p = param_with_grad(vec![0.0], 1.0);
    let mut opt = sgd(&[&p], config);
    opt.step().unwrap();
    let json = serde_json::to_string(&opt.state_dict()).unwrap();

    let mut resumed = sgd(&[&p], SgdConfig { lr: 0.7, ..config });
    resumed.load_state_dict(&serde_json::from_str(&json).unwrap()).unwrap();
    assert_eq!(resumed.learning_rate(), 0.1);
    resumed.step().unwrap();
    check_tensor_near(&p, &[1], &reference.get_f32_data(), 1e-6);
}

#[test]
fn test_sgd_load_state_dict_errors() {
    let p = param_with_grad(vec![0.0, 0.0], 1.0);
    let mut opt = sgd(&[&p], SgdConfig { momentum: 0.9, ..Default::default() });

    let mut velocity = BTreeMap::new();
    velocity.insert("p0".to_string(), vec![1.0]);
    let wrong_len = OptimizerState::Sgd { lr: 0.1, velocity };
    assert!(matches!(opt.load_state_dict(&wrong_len), Err(NapcasError::ShapeMismatch { .. })));

    let mut velocity = BTreeMap::new();
    velocity.insert("missing".to_string(), vec![1.0, 1.0]);
    let unknown = OptimizerState::Sgd { lr: 0.1, velocity };
    assert!(matches!(opt.load_state_dict(&unknown), Err(NapcasError::OptimizerState(_))));

    let adam = OptimizerState::Adam { lr: 0.1, params: BTreeMap::new() };
    assert!(matches!(opt.load_state_dict(&adam), Err(NapcasError::OptimizerState(_))));
}
