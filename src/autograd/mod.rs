//! Tensor storage
//!
//! Parameters are flat f32 tensors tagged with a `requires_grad` flag; the
//! flag is what the LoRA trainability selector flips.

mod tensor;

pub use tensor::Tensor;
