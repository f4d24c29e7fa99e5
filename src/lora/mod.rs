//! LoRA (Low-Rank Adaptation) utilities
//!
//! Parameters are identified purely by name: any qualified name containing
//! `lora_` belongs to an adapter. On top of that convention this module
//! provides trainability selection ([`mark_only_lora_as_trainable`]) and
//! adapter checkpoint extraction ([`lora_state_dict`]), both driven by a
//! [`LoraBias`] mode.

mod bias;
mod config;
mod layer;
mod state_dict;
mod trainable;

pub use bias::LoraBias;
pub use config::LoRAConfig;
pub use layer::LoRALinear;
pub use state_dict::{
    load_state_dict, lora_bias_key, lora_state_dict, lora_state_dict_str, state_dict, LoadReport,
    StateDict,
};
pub use trainable::{mark_only_lora_as_trainable, mark_only_lora_as_trainable_str};

/// Substring marking a parameter as adapter-specific
pub const LORA_MARKER: &str = "lora_";

/// Substring marking a parameter as a bias
pub const BIAS_MARKER: &str = "bias";
