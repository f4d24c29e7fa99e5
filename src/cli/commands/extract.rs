//! Extract command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::ExtractArgs;
use crate::io::{load_safetensors, save_safetensors, AdapterConfig};
use crate::lora::{lora_state_dict, LoRAConfig, LoraBias};
use std::collections::HashMap;
use tracing::warn;

pub fn run_extract(args: ExtractArgs, level: LogLevel) -> Result<(), String> {
    let config = args
        .config
        .as_ref()
        .map(|path| LoRAConfig::load(path).map_err(|e| format!("Config error: {e}")))
        .transpose()?;

    let bias = args
        .bias
        .or_else(|| config.as_ref().map(|c| c.bias))
        .unwrap_or(LoraBias::None);

    log(
        level,
        LogLevel::Normal,
        &format!("Extracting LoRA checkpoint from {} (bias={bias})", args.input.display()),
    );

    let snapshot = load_safetensors(&args.input)
        .map_err(|e| format!("Failed to load {}: {e}", args.input.display()))?;
    let adapter = lora_state_dict(&snapshot, bias);

    if adapter.is_empty() {
        warn!(input = %args.input.display(), "snapshot contains no LoRA parameters");
    }

    for (name, tensor) in adapter.iter() {
        log(level, LogLevel::Verbose, &format!("  {name} {:?}", tensor.shape()));
    }

    let mut metadata = HashMap::new();
    metadata.insert("lora_bias".to_string(), bias.to_string());
    save_safetensors(&adapter, &args.output, &metadata)
        .map_err(|e| format!("Failed to save {}: {e}", args.output.display()))?;

    if args.adapter_config {
        let config = config.ok_or("--adapter-config requires --config")?;
        let path = args.output.with_file_name("adapter_config.json");
        AdapterConfig::from_lora_config(&config, args.base_model.as_deref())
            .with_bias(bias)
            .save(&path)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        log(level, LogLevel::Verbose, &format!("  Adapter config: {}", path.display()));
    }

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Kept {} of {} tensors ({} parameters) -> {}",
            adapter.len(),
            snapshot.len(),
            adapter.num_elements(),
            args.output.display()
        ),
    );

    Ok(())
}
