//! CLI module for lora-mark
//!
//! Command handlers return `Result<(), String>`; the binary prints the error
//! and exits non-zero.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

pub use crate::config::Cli;
