//! SafeTensors persistence for state dicts

use crate::lora::StateDict;
use crate::{Error, Result, Tensor};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Write `dict` as an F32 SafeTensors file
///
/// The header metadata always carries `format = "pt"`; `metadata` entries are
/// added on top (e.g. `lora_bias`).
pub fn save_safetensors(
    dict: &StateDict,
    path: impl AsRef<Path>,
    metadata: &HashMap<String, String>,
) -> Result<()> {
    let path = path.as_ref();

    let tensor_data: Vec<(&str, Vec<u8>, Vec<usize>)> = dict
        .iter()
        .map(|(name, tensor)| {
            let bytes: Vec<u8> = bytemuck::cast_slice(tensor.as_slice()).to_vec();
            (name, bytes, tensor.shape().to_vec())
        })
        .collect();

    let views = tensor_data
        .iter()
        .map(|(name, bytes, shape)| {
            TensorView::new(Dtype::F32, shape.clone(), bytes)
                .map(|view| (*name, view))
                .map_err(|e| Error::SafeTensors(format!("invalid tensor '{name}': {e}")))
        })
        .collect::<Result<Vec<(&str, TensorView<'_>)>>>()?;

    let mut header = HashMap::new();
    header.insert("format".to_string(), "pt".to_string());
    header.extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));

    let bytes = safetensors::serialize(views, Some(header))
        .map_err(|e| Error::SafeTensors(format!("serialization failed: {e}")))?;
    std::fs::write(path, bytes)?;

    info!(path = %path.display(), tensors = dict.len(), "saved state dict");
    Ok(())
}

/// Read an F32 SafeTensors file into a state dict (keys sorted by name)
pub fn load_safetensors(path: impl AsRef<Path>) -> Result<StateDict> {
    let data = std::fs::read(path.as_ref())?;
    let tensors = SafeTensors::deserialize(&data)
        .map_err(|e| Error::SafeTensors(format!("{}: {e}", path.as_ref().display())))?;

    let mut names = tensors.names();
    names.sort();

    let mut dict = StateDict::new();
    for name in names {
        let view = tensors
            .tensor(name)
            .map_err(|e| Error::SafeTensors(format!("tensor '{name}': {e}")))?;
        if view.dtype() != Dtype::F32 {
            return Err(Error::UnsupportedDtype { name: name.to_string(), dtype: format!("{:?}", view.dtype()) });
        }
        let values: Vec<f32> = view
            .data()
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        dict.insert(name, Tensor::with_shape(values, view.shape().to_vec(), false)?);
    }
    Ok(dict)
}

/// Read only the header metadata of a SafeTensors file
pub fn read_metadata(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let data = std::fs::read(path.as_ref())?;
    let (_, metadata) = SafeTensors::read_metadata(&data)
        .map_err(|e| Error::SafeTensors(format!("{}: {e}", path.as_ref().display())))?;
    Ok(metadata.metadata().clone().unwrap_or_default())
}
