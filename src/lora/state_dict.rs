//! Parameter snapshots and LoRA checkpoint extraction

use super::{LoraBias, BIAS_MARKER, LORA_MARKER};
use crate::nn::{for_each_parameter_mut, named_parameters, Module};
use crate::{Error, Result, Tensor};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Insertion-ordered mapping from qualified parameter name to tensor
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateDict {
    entries: Vec<(String, Tensor)>,
    index: HashMap<String, usize>,
}

impl StateDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Tensor) -> Option<Tensor> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Tensor> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of scalar values across all tensors
    pub fn num_elements(&self) -> usize {
        self.entries.iter().map(|(_, t)| t.len()).sum()
    }
}

impl FromIterator<(String, Tensor)> for StateDict {
    fn from_iter<I: IntoIterator<Item = (String, Tensor)>>(iter: I) -> Self {
        let mut dict = StateDict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

impl IntoIterator for StateDict {
    type Item = (String, Tensor);
    type IntoIter = std::vec::IntoIter<(String, Tensor)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Full snapshot of a model's parameters, in graph order
pub fn state_dict(model: &dyn Module) -> StateDict {
    named_parameters(model).into_iter().map(|(name, tensor)| (name, tensor.clone())).collect()
}

/// Bias key paired with a LoRA key: everything before the first `lora_`
/// followed by `bias` (`"layer.lora_A"` -> `"layer.bias"`)
pub fn lora_bias_key(key: &str) -> Option<String> {
    key.find(LORA_MARKER).map(|pos| format!("{}{}", &key[..pos], BIAS_MARKER))
}

/// Select the entries of `snapshot` that make up a LoRA checkpoint
///
/// - [`LoraBias::None`]: keys containing `lora_`
/// - [`LoraBias::All`]: keys containing `lora_` or `bias`
/// - [`LoraBias::LoraOnly`]: keys containing `lora_`, plus for each such key
///   its [`lora_bias_key`] when the snapshot has it
///
/// Only keys of `snapshot` are returned, each once, in snapshot order (a
/// derived bias key is placed right after the first LoRA key that derives it).
pub fn lora_state_dict(snapshot: &StateDict, bias: LoraBias) -> StateDict {
    let mut selected = StateDict::new();
    match bias {
        LoraBias::None => {
            for (key, value) in snapshot.iter().filter(|(k, _)| k.contains(LORA_MARKER)) {
                selected.insert(key, value.clone());
            }
        }
        LoraBias::All => {
            for (key, value) in snapshot
                .iter()
                .filter(|(k, _)| k.contains(LORA_MARKER) || k.contains(BIAS_MARKER))
            {
                selected.insert(key, value.clone());
            }
        }
        LoraBias::LoraOnly => {
            for (key, value) in snapshot.iter().filter(|(k, _)| k.contains(LORA_MARKER)) {
                selected.insert(key, value.clone());
                if let Some(bias_key) = lora_bias_key(key) {
                    if let Some(bias_value) = snapshot.get(&bias_key) {
                        selected.insert(bias_key, bias_value.clone());
                    }
                }
            }
        }
    }

    debug!(%bias, kept = selected.len(), total = snapshot.len(), "extracted LoRA state dict");
    selected
}

/// [`lora_state_dict`] with the bias mode given by name
pub fn lora_state_dict_str(snapshot: &StateDict, bias: &str) -> Result<StateDict> {
    let bias: LoraBias = bias.parse()?;
    Ok(lora_state_dict(snapshot, bias))
}

/// Outcome of [`load_state_dict`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Parameters overwritten from the state dict
    pub loaded: Vec<String>,
    /// Model parameters with no entry in the state dict
    pub missing_keys: Vec<String>,
    /// State dict entries with no matching model parameter
    pub unexpected_keys: Vec<String>,
}

/// Copy values from `dict` into the same-named parameters of `model`
///
/// Trainability flags are kept. Shapes must match exactly. With `strict`,
/// any missing or unexpected key fails the load before anything is written.
pub fn load_state_dict(model: &mut dyn Module, dict: &StateDict, strict: bool) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    let mut model_keys = HashSet::new();

    for (name, param) in named_parameters(&*model) {
        match dict.get(&name) {
            Some(value) if value.shape() != param.shape() => {
                return Err(Error::ShapeMismatch {
                    name,
                    expected: param.shape().to_vec(),
                    actual: value.shape().to_vec(),
                });
            }
            Some(_) => report.loaded.push(name.clone()),
            None => report.missing_keys.push(name.clone()),
        }
        model_keys.insert(name);
    }
    report.unexpected_keys =
        dict.keys().filter(|k| !model_keys.contains(*k)).map(str::to_string).collect();

    if strict && (!report.missing_keys.is_empty() || !report.unexpected_keys.is_empty()) {
        return Err(Error::StateDictMismatch {
            missing: report.missing_keys,
            unexpected: report.unexpected_keys,
        });
    }

    for_each_parameter_mut(model, |name, param| {
        if let Some(value) = dict.get(name) {
            param.data_mut().assign(value.data());
        }
    });

    debug!(
        loaded = report.loaded.len(),
        missing = report.missing_keys.len(),
        unexpected = report.unexpected_keys.len(),
        "loaded state dict"
    );
    Ok(report)
}
