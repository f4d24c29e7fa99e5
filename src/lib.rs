//! lora-mark: LoRA trainability selection and adapter checkpoint extraction
//!
//! Given a module tree whose parameters follow the `lora_` naming convention,
//! this crate can:
//!
//! - freeze everything except the LoRA matrices (plus, optionally, biases)
//!   with [`lora::mark_only_lora_as_trainable`]
//! - reduce a full state dict to the adapter subset with
//!   [`lora::lora_state_dict`]
//! - persist and restore those subsets as SafeTensors via [`io`]
//!
//! # Example
//!
//! ```
//! use lora_mark::lora::{lora_state_dict, mark_only_lora_as_trainable, state_dict, LoRALinear, LoraBias};
//! use lora_mark::nn::{Linear, Sequential};
//! use lora_mark::Tensor;
//!
//! let base = Tensor::from_vec(vec![0.0; 8], false);
//! let q_proj = LoRALinear::new(base, 2, 4, 2)?.with_bias(Tensor::from_vec(vec![0.0; 2], true))?;
//! let mut model = Sequential::new().add("q_proj", q_proj).add("out", Linear::new(2, 2, true));
//!
//! mark_only_lora_as_trainable(&mut model, LoraBias::LoraOnly);
//!
//! let adapter = lora_state_dict(&state_dict(&model), LoraBias::LoraOnly);
//! assert_eq!(adapter.keys().collect::<Vec<_>>(), vec!["q_proj.lora_A", "q_proj.bias", "q_proj.lora_B"]);
//! # Ok::<(), lora_mark::Error>(())
//! ```

pub mod autograd;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod lora;
pub mod nn;

pub use autograd::Tensor;
pub use error::{Error, Result};
