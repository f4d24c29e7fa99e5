//! LoRA configuration

use super::LoraBias;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// LoRA adapter configuration
///
/// Loaded from YAML (`.yaml`/`.yml`) or JSON (anything else):
///
/// ```yaml
/// rank: 8
/// alpha: 16.0
/// target_modules: [q_proj, v_proj]
/// bias: lora_only
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoRAConfig {
    /// Rank of the low-rank matrices (r)
    pub rank: usize,
    /// Scaling parameter; effective scale is alpha / rank
    pub alpha: f32,
    /// Module names that receive adapters
    #[serde(default)]
    pub target_modules: HashSet<String>,
    /// Which biases train and are saved with the adapter
    #[serde(default)]
    pub bias: LoraBias,
    /// Dropout on the LoRA branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout: Option<f32>,
}

impl LoRAConfig {
    pub fn new(rank: usize, alpha: f32) -> Self {
        Self { rank, alpha, target_modules: HashSet::new(), bias: LoraBias::None, dropout: None }
    }

    /// Add module names that receive adapters
    pub fn with_target_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_modules.extend(modules.into_iter().map(Into::into));
        self
    }

    pub fn with_bias(mut self, bias: LoraBias) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout = Some(dropout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rank == 0 {
            return Err(Error::ConfigError("rank must be at least 1".to_string()));
        }
        if !(self.alpha > 0.0) {
            return Err(Error::ConfigError(format!("alpha must be positive, got {}", self.alpha)));
        }
        if let Some(dropout) = self.dropout {
            if !(0.0..1.0).contains(&dropout) {
                return Err(Error::ConfigError(format!("dropout must be in [0, 1), got {dropout}")));
            }
        }
        Ok(())
    }

    /// Parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"));

        let config: Self = if is_yaml {
            serde_yaml::from_str(&text)
                .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?
        } else {
            serde_json::from_str(&text)
                .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?
        };
        config.validate()?;
        Ok(config)
    }
}
