//! Inspect command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{InspectArgs, OutputFormat};
use crate::io::load_safetensors;
use crate::lora::{lora_state_dict, LoraBias};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TensorEntry {
    name: String,
    shape: Vec<usize>,
    numel: usize,
    kept: bool,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    bias: LoraBias,
    total_tensors: usize,
    kept_tensors: usize,
    total_parameters: usize,
    kept_parameters: usize,
    tensors: Vec<TensorEntry>,
}

pub fn run_inspect(args: InspectArgs, level: LogLevel) -> Result<(), String> {
    let snapshot = load_safetensors(&args.input)
        .map_err(|e| format!("Failed to load {}: {e}", args.input.display()))?;
    let adapter = lora_state_dict(&snapshot, args.bias);

    let tensors: Vec<TensorEntry> = snapshot
        .iter()
        .map(|(name, tensor)| TensorEntry {
            name: name.to_string(),
            shape: tensor.shape().to_vec(),
            numel: tensor.len(),
            kept: adapter.contains_key(name),
        })
        .collect();

    let report = InspectReport {
        bias: args.bias,
        total_tensors: snapshot.len(),
        kept_tensors: adapter.len(),
        total_parameters: snapshot.num_elements(),
        kept_parameters: adapter.num_elements(),
        tensors,
    };

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, &format!("Snapshot: {}", args.input.display()));
            for entry in &report.tensors {
                let marker = if entry.kept { "*" } else { " " };
                log(
                    level,
                    LogLevel::Normal,
                    &format!("{marker} {} {:?} ({})", entry.name, entry.shape, entry.numel),
                );
            }
            log(
                level,
                LogLevel::Normal,
                &format!(
                    "Adapter (bias={}): {}/{} tensors, {}/{} parameters",
                    report.bias,
                    report.kept_tensors,
                    report.total_tensors,
                    report.kept_parameters,
                    report.total_parameters
                ),
            );
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}
