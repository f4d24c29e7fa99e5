//! Command-line configuration
//!
//! LoRA adapter settings live in [`crate::lora::LoRAConfig`]; this module
//! holds the clap argument types of the `lora-mark` binary.

mod cli;

pub use cli::{Cli, Command, ExtractArgs, InspectArgs, OutputFormat};
