//! LoRA (Low-Rank Adaptation) layer implementation
//!
//! LoRA enables parameter-efficient fine-tuning by adding trainable low-rank
//! decomposition matrices to frozen pretrained weights.

mod core;

#[cfg(test)]
mod tests;

pub use self::core::LoRALinear;
