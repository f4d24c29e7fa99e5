//! CLI types - Cli, Command, and argument structs

use crate::lora::LoraBias;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lora-mark: LoRA trainability selection and adapter checkpoint extraction
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lora-mark")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Extract LoRA adapter checkpoints from full model snapshots")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Write the LoRA subset of a SafeTensors snapshot to a new file
    Extract(ExtractArgs),

    /// List the tensors of a snapshot and which ones an adapter checkpoint keeps
    Inspect(InspectArgs),
}

/// Arguments for the extract command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ExtractArgs {
    /// Full model snapshot (.safetensors)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output adapter checkpoint (.safetensors)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Bias mode: none, all, lora_only (overrides the config file)
    #[arg(short, long)]
    pub bias: Option<LoraBias>,

    /// LoRA config file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write adapter_config.json next to the output
    #[arg(long, requires = "config")]
    pub adapter_config: bool,

    /// Base model name recorded in adapter_config.json
    #[arg(long)]
    pub base_model: Option<String>,
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    /// Snapshot to inspect (.safetensors)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Bias mode used to decide which tensors are kept
    #[arg(short, long, default_value = "none")]
    pub bias: LoraBias,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the inspect command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}
