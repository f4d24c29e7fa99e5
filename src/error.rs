//! Error types for lora-mark

use thiserror::Error;

/// Result type alias for lora-mark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while selecting, extracting, or persisting LoRA parameters
#[derive(Error, Debug)]
pub enum Error {
    /// Bias mode is not one of `none`, `all`, `lora_only`
    #[error("Unsupported LoRA bias mode '{0}'\n  → Use one of: none, all, lora_only")]
    UnsupportedBias(String),

    /// Tensor shape does not match the expected shape
    #[error("Shape mismatch for '{name}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch { name: String, expected: Vec<usize>, actual: Vec<usize> },

    /// Strict state dict load found missing or unexpected keys
    #[error("State dict mismatch: missing keys {missing:?}, unexpected keys {unexpected:?}")]
    StateDictMismatch { missing: Vec<String>, unexpected: Vec<String> },

    /// Persisted tensor uses a dtype other than F32
    #[error("Unsupported dtype for '{name}': {dtype}\n  → Only F32 tensors are supported")]
    UnsupportedDtype { name: String, dtype: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON/YAML (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SafeTensors encode/decode failed
    #[error("SafeTensors error: {0}")]
    SafeTensors(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_bias_lists_valid_modes() {
        let msg = Error::UnsupportedBias("some".into()).to_string();
        assert!(msg.contains("'some'"));
        assert!(msg.contains("none"));
        assert!(msg.contains("all"));
        assert!(msg.contains("lora_only"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = Error::ShapeMismatch { name: "fc.weight".into(), expected: vec![4, 2], actual: vec![8] };
        let msg = err.to_string();
        assert!(msg.contains("fc.weight"));
        assert!(msg.contains("[4, 2]"));
        assert!(msg.contains("[8]"));
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
