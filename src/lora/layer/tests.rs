//! Tests for LoRA layer

use super::*;
use crate::lora::{load_state_dict, state_dict, StateDict};
use crate::nn::{Module, ModuleKind};
use crate::Tensor;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;

fn base_weight(d_out: usize, d_in: usize) -> Tensor {
    Tensor::from_vec((0..d_out * d_in).map(|i| (i as f32 * 0.1).sin()).collect(), false)
}

// ========================================================================
// PROPERTY TESTS
// ========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(100))]

    #[test]
    fn prop_adapter_shapes_follow_rank(
        d_out in 1usize..10,
        d_in in 1usize..10,
        rank in 1usize..5,
    ) {
        let lora = LoRALinear::new(base_weight(d_out, d_in), d_out, d_in, rank).unwrap();

        prop_assert_eq!(lora.weight().shape(), &[d_out, d_in]);
        prop_assert_eq!(lora.lora_a().shape(), &[rank, d_in]);
        prop_assert_eq!(lora.lora_b().shape(), &[d_out, rank]);
        prop_assert!(lora.lora_b().as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn prop_base_weight_values_kept(
        d_out in 1usize..8,
        d_in in 1usize..8,
    ) {
        let weight = base_weight(d_out, d_in);
        let lora = LoRALinear::new(weight.clone(), d_out, d_in, 1).unwrap();

        for (got, want) in lora.weight().as_slice().iter().zip(weight.as_slice()) {
            prop_assert!((got - want).abs() < 1e-6);
        }
    }
}

// ========================================================================
// UNIT TESTS
// ========================================================================

#[test]
fn test_parameter_names_and_flags() {
    let lora = LoRALinear::new(base_weight(3, 2), 3, 2, 2)
        .unwrap()
        .with_bias(Tensor::zeros(3, true))
        .unwrap();

    let params = lora.parameters();
    let names: Vec<&str> = params.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["weight", "lora_A", "lora_B", "bias"]);

    let flags: Vec<bool> = params.iter().map(|(_, t)| t.requires_grad()).collect();
    assert_eq!(flags, vec![false, true, true, true]);
}

#[test]
fn test_kind_is_lora() {
    let lora = LoRALinear::new(base_weight(2, 2), 2, 2, 1).unwrap();
    assert_eq!(lora.kind(), ModuleKind::LoRA);
    assert!(lora.bias().is_none());
    assert_eq!(lora.rank(), 1);
}

#[test]
fn test_lora_a_init_is_small() {
    let lora = LoRALinear::new(base_weight(2, 4), 2, 4, 2).unwrap();
    assert_abs_diff_eq!(lora.lora_a().as_slice()[0], 0.0, epsilon = 1e-6);
    assert!(lora.lora_a().as_slice().iter().all(|v| v.abs() <= 0.01));
}

#[test]
fn test_rejects_bad_base_weight() {
    assert!(LoRALinear::new(Tensor::zeros(5, false), 2, 2, 1).is_err());
}

#[test]
fn test_rejects_zero_rank() {
    assert!(LoRALinear::new(base_weight(2, 2), 2, 2, 0).is_err());
}

#[test]
fn test_rejects_bad_bias() {
    let lora = LoRALinear::new(base_weight(2, 2), 2, 2, 1).unwrap();
    assert!(lora.with_bias(Tensor::zeros(3, true)).is_err());
}

#[test]
fn test_row_bias_is_flattened() {
    let row = Tensor::with_shape(vec![0.0; 3], vec![1, 3], true).unwrap();
    let lora = LoRALinear::new(base_weight(3, 2), 3, 2, 1).unwrap().with_bias(row).unwrap();
    assert_eq!(lora.bias().map(Tensor::shape), Some(&[3][..]));

    let mut dict = StateDict::new();
    dict.insert("bias", Tensor::from_vec(vec![1.0, 2.0, 3.0], false));

    let mut lora = lora;
    let report = load_state_dict(&mut lora, &dict, false).unwrap();
    assert_eq!(report.loaded, vec!["bias"]);
    assert_eq!(state_dict(&lora).get("bias").unwrap().as_slice(), &[1.0, 2.0, 3.0]);
}
