//! PEFT-compatible adapter_config.json generation
//!
//! Written next to an extracted adapter checkpoint so that the checkpoint can
//! be loaded by `peft.PeftModel.from_pretrained()`.

use crate::lora::{LoRAConfig, LoraBias};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// PEFT adapter configuration matching the HuggingFace PEFT schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdapterConfig {
    /// PEFT method type (always "LORA")
    pub peft_type: String,
    /// LoRA rank
    pub r: usize,
    /// LoRA alpha scaling parameter
    pub lora_alpha: f32,
    /// Target module names, sorted
    pub target_modules: Vec<String>,
    /// LoRA dropout rate (0.0 if not used)
    pub lora_dropout: f32,
    /// Bias handling the checkpoint was extracted with
    pub bias: LoraBias,
    /// Base model name or path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_model_name_or_path: Option<String>,
    /// Fan-in/fan-out setting
    #[serde(default)]
    pub fan_in_fan_out: bool,
    /// Inference mode
    #[serde(default)]
    pub inference_mode: bool,
}

impl AdapterConfig {
    /// Build from a [`LoRAConfig`]
    pub fn from_lora_config(config: &LoRAConfig, base_model: Option<&str>) -> Self {
        let mut target_modules: Vec<String> = config.target_modules.iter().cloned().collect();
        target_modules.sort();

        Self {
            peft_type: "LORA".to_string(),
            r: config.rank,
            lora_alpha: config.alpha,
            target_modules,
            lora_dropout: config.dropout.unwrap_or(0.0),
            bias: config.bias,
            base_model_name_or_path: base_model.map(String::from),
            fan_in_fan_out: false,
            inference_mode: false,
        }
    }

    pub fn with_bias(mut self, bias: LoraBias) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_inference_mode(mut self, inference_mode: bool) -> Self {
        self.inference_mode = inference_mode;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
