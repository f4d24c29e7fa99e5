//! lora-mark CLI
//!
//! # Usage
//!
//! ```bash
//! # Write only the LoRA tensors of a snapshot
//! lora-mark extract model.safetensors -o adapter.safetensors
//!
//! # Keep the biases of adapted layers and emit adapter_config.json
//! lora-mark extract model.safetensors -o out/adapter.safetensors \
//!     --bias lora_only --config lora.yaml --adapter-config
//!
//! # Show which tensors an adapter checkpoint would keep
//! lora-mark inspect model.safetensors --bias all --format json
//! ```

use clap::Parser;
use lora_mark::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.tracing_filter().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
