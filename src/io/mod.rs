//! Checkpoint persistence
//!
//! State dicts are stored as F32 SafeTensors; adapter checkpoints can carry a
//! PEFT-style `adapter_config.json` alongside.

mod adapter_config;
mod checkpoint;

pub use adapter_config::AdapterConfig;
pub use checkpoint::{load_safetensors, read_metadata, save_safetensors};
