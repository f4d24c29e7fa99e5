//! Freeze everything except the LoRA matrices (and optionally some biases)

use super::{LoraBias, BIAS_MARKER, LORA_MARKER};
use crate::nn::{
    for_each_module_mut, for_each_parameter_mut, num_parameters, num_trainable_parameters, Module,
    ModuleKind,
};
use crate::Result;
use tracing::debug;

/// Set `requires_grad` so that only LoRA parameters (plus the biases chosen
/// by `bias`) train
///
/// Every parameter whose qualified name lacks `lora_` is frozen first; LoRA
/// parameters keep whatever flag they already have. Then:
/// - [`LoraBias::None`]: nothing else
/// - [`LoraBias::All`]: every parameter whose name contains `bias` is unfrozen
/// - [`LoraBias::LoraOnly`]: the bias of every [`ModuleKind::LoRA`] module that
///   has one is unfrozen
pub fn mark_only_lora_as_trainable(model: &mut dyn Module, bias: LoraBias) {
    let mut frozen = 0usize;
    for_each_parameter_mut(model, |name, param| {
        if !name.contains(LORA_MARKER) {
            param.set_requires_grad(false);
            frozen += 1;
        }
    });

    let mut unfrozen = 0usize;
    match bias {
        LoraBias::None => {}
        LoraBias::All => for_each_parameter_mut(model, |name, param| {
            if name.contains(BIAS_MARKER) {
                param.set_requires_grad(true);
                unfrozen += 1;
            }
        }),
        LoraBias::LoraOnly => for_each_module_mut(model, |_, module| {
            if module.kind() == ModuleKind::LoRA {
                if let Some(param) = module.bias_mut() {
                    param.set_requires_grad(true);
                    unfrozen += 1;
                }
            }
        }),
    }

    debug!(
        %bias,
        frozen,
        unfrozen,
        trainable = num_trainable_parameters(&*model),
        total = num_parameters(&*model),
        "marked only LoRA parameters as trainable"
    );
}

/// [`mark_only_lora_as_trainable`] with the bias mode given by name
///
/// The name is parsed before the graph is touched, so an unsupported mode
/// leaves every flag unchanged.
pub fn mark_only_lora_as_trainable_str(model: &mut dyn Module, bias: &str) -> Result<()> {
    let bias: LoraBias = bias.parse()?;
    mark_only_lora_as_trainable(model, bias);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lora::LoRALinear;
    use crate::nn::{named_parameters, Linear, Sequential};
    use crate::{Error, Tensor};
    use std::collections::HashMap;

    fn lora_layer(d_out: usize, d_in: usize, bias: bool) -> LoRALinear {
        let layer = LoRALinear::new(Tensor::zeros(d_out * d_in, true), d_out, d_in, 2).unwrap();
        if bias {
            layer.with_bias(Tensor::zeros(d_out, true)).unwrap()
        } else {
            layer
        }
    }

    /// attn (LoRA, bias), mlp.fc (plain, bias), mlp.proj (LoRA, no bias), norm_bias_free (plain, no bias)
    fn make_model() -> Sequential {
        Sequential::new()
            .add("attn", lora_layer(4, 4, true))
            .add(
                "mlp",
                Sequential::new().add("fc", Linear::new(4, 8, true)).add("proj", lora_layer(4, 8, false)),
            )
            .add("head", Linear::new(4, 2, false))
    }

    fn flags(model: &Sequential) -> HashMap<String, bool> {
        named_parameters(model).into_iter().map(|(n, t)| (n, t.requires_grad())).collect()
    }

    #[test]
    fn test_none_freezes_everything_but_lora() {
        let mut model = make_model();
        mark_only_lora_as_trainable(&mut model, LoraBias::None);

        for (name, trainable) in flags(&model) {
            assert_eq!(trainable, name.contains("lora_"), "unexpected flag for {name}");
        }
    }

    #[test]
    fn test_all_unfreezes_every_bias() {
        let mut model = make_model();
        mark_only_lora_as_trainable(&mut model, LoraBias::All);

        let flags = flags(&model);
        assert!(flags["attn.bias"]);
        assert!(flags["mlp.fc.bias"]);
        assert!(!flags["attn.weight"]);
        assert!(!flags["mlp.fc.weight"]);
        assert!(!flags["head.weight"]);
        assert!(flags["attn.lora_A"]);
        assert!(flags["mlp.proj.lora_B"]);
    }

    #[test]
    fn test_lora_only_unfreezes_lora_module_biases() {
        let mut model = make_model();
        mark_only_lora_as_trainable(&mut model, LoraBias::LoraOnly);

        let flags = flags(&model);
        assert!(flags["attn.bias"]);
        assert!(!flags["mlp.fc.bias"]);
        assert!(!flags["attn.weight"]);
        assert!(flags["mlp.proj.lora_A"]);
    }

    #[test]
    fn test_lora_parameters_left_untouched() {
        let mut model = Sequential::new().add("attn", lora_layer(2, 2, true));
        for_each_parameter_mut(&mut model, |name, p| {
            if name.ends_with("lora_B") {
                p.set_requires_grad(false);
            }
        });

        mark_only_lora_as_trainable(&mut model, LoraBias::None);
        let flags = flags(&model);
        assert!(flags["attn.lora_A"]);
        assert!(!flags["attn.lora_B"]);
    }

    #[test]
    fn test_all_overrides_prior_frozen_bias() {
        let mut model = make_model();
        mark_only_lora_as_trainable(&mut model, LoraBias::None);
        mark_only_lora_as_trainable(&mut model, LoraBias::All);
        assert!(flags(&model)["mlp.fc.bias"]);
    }

    #[test]
    fn test_lora_only_on_root_module() {
        let mut layer = lora_layer(3, 3, true);
        mark_only_lora_as_trainable(&mut layer, LoraBias::LoraOnly);

        let params = layer.parameters();
        let trainable: Vec<&str> = params.iter().filter(|(_, t)| t.requires_grad()).map(|(n, _)| *n).collect();
        assert_eq!(trainable, vec!["lora_A", "lora_B", "bias"]);
    }

    #[test]
    fn test_idempotent() {
        for bias in [LoraBias::None, LoraBias::All, LoraBias::LoraOnly] {
            let mut once = make_model();
            mark_only_lora_as_trainable(&mut once, bias);

            let mut twice = make_model();
            mark_only_lora_as_trainable(&mut twice, bias);
            mark_only_lora_as_trainable(&mut twice, bias);

            assert_eq!(flags(&once), flags(&twice), "not idempotent for {bias}");
        }
    }

    #[test]
    fn test_parameter_counts_after_marking() {
        let mut model = make_model();
        let total = num_parameters(&model);

        mark_only_lora_as_trainable(&mut model, LoraBias::LoraOnly);

        // attn: A [2,4] + B [4,2] + bias [4]; mlp.proj: A [2,8] + B [4,2]
        assert_eq!(num_trainable_parameters(&model), 8 + 8 + 4 + 16 + 8);
        assert_eq!(num_parameters(&model), total);
    }

    #[test]
    fn test_empty_model_is_noop() {
        let mut model = Sequential::new();
        mark_only_lora_as_trainable(&mut model, LoraBias::All);
        assert!(named_parameters(&model).is_empty());
    }

    #[test]
    fn test_str_entry_point() {
        let mut model = make_model();
        mark_only_lora_as_trainable_str(&mut model, "lora_only").unwrap();
        assert!(flags(&model)["attn.bias"]);
    }

    #[test]
    fn test_unsupported_mode_leaves_flags_unchanged() {
        let mut model = make_model();
        let before = flags(&model);

        let err = mark_only_lora_as_trainable_str(&mut model, "some").unwrap_err();
        assert!(matches!(err, Error::UnsupportedBias(ref s) if s == "some"));
        assert_eq!(flags(&model), before);
    }
}
