//! Dense layer without adaptation

use super::module::Module;
use crate::{Error, Result, Tensor};

/// Fully-connected layer holding `weight` and an optional `bias`
#[derive(Clone, Debug)]
pub struct Linear {
    /// Weight [d_out, d_in]
    weight: Tensor,
    /// Optional bias [d_out]
    bias: Option<Tensor>,
    d_out: usize,
    d_in: usize,
}

impl Linear {
    /// Create a trainable layer with deterministic small weights and a zero bias
    pub fn new(d_in: usize, d_out: usize, bias: bool) -> Self {
        let weight = Tensor::from_fn(vec![d_out, d_in], true, |i| (i as f32 * 0.37).cos() * 0.02);
        let bias = bias.then(|| Tensor::zeros(d_out, true));
        Self { weight, bias, d_out, d_in }
    }

    /// Build a layer from existing weights
    pub fn from_weights(weight: Tensor, bias: Option<Tensor>, d_out: usize, d_in: usize) -> Result<Self> {
        if weight.len() != d_out * d_in {
            return Err(Error::ShapeMismatch {
                name: String::from("weight"),
                expected: vec![d_out, d_in],
                actual: weight.shape().to_vec(),
            });
        }
        if let Some(b) = &bias {
            if b.len() != d_out {
                return Err(Error::ShapeMismatch {
                    name: String::from("bias"),
                    expected: vec![d_out],
                    actual: b.shape().to_vec(),
                });
            }
        }
        let weight = weight.reshape(vec![d_out, d_in])?;
        let bias = bias.map(|b| b.reshape(vec![d_out])).transpose()?;
        Ok(Self { weight, bias, d_out, d_in })
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn d_out(&self) -> usize {
        self.d_out
    }

    pub fn d_in(&self) -> usize {
        self.d_in
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<(&str, &Tensor)> {
        let mut params = vec![("weight", &self.weight)];
        if let Some(bias) = &self.bias {
            params.push(("bias", bias));
        }
        params
    }

    fn parameters_mut(&mut self) -> Vec<(&str, &mut Tensor)> {
        let mut params = vec![("weight", &mut self.weight)];
        if let Some(bias) = self.bias.as_mut() {
            params.push(("bias", bias));
        }
        params
    }

    fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }

    fn bias_mut(&mut self) -> Option<&mut Tensor> {
        self.bias.as_mut()
    }
}
