//! LoRA (Low-Rank Adaptation) linear layer
//!
//! For a frozen weight matrix W ∈ ℝ^(d_out × d_in), LoRA adds:
//! ΔW = B @ A where A ∈ ℝ^(r × d_in) and B ∈ ℝ^(d_out × r)
//!
//! Only the parameter layout lives here; the layer reports its tensors to the
//! module graph and tags itself as [`ModuleKind::LoRA`].

use crate::nn::{Module, ModuleKind};
use crate::{Error, Result, Tensor};

/// Linear layer with a trainable low-rank adaptation of a frozen base weight
///
/// Parameters are reported as `weight`, `lora_A`, `lora_B` and, when present,
/// `bias`. The base weight starts frozen; the LoRA matrices and the bias start
/// trainable.
#[derive(Clone, Debug)]
pub struct LoRALinear {
    /// Frozen base weight [d_out, d_in]
    weight: Tensor,
    /// LoRA matrix A [r, d_in] - downprojection
    lora_a: Tensor,
    /// LoRA matrix B [d_out, r] - upprojection
    lora_b: Tensor,
    /// Optional bias [d_out]
    bias: Option<Tensor>,
    d_out: usize,
    d_in: usize,
    rank: usize,
}

impl LoRALinear {
    /// Wrap a pretrained weight `[d_out * d_in]` with a rank-`rank` adapter
    ///
    /// A gets small deterministic values and B starts at zero, so B·A is
    /// initially zero.
    pub fn new(base_weight: Tensor, d_out: usize, d_in: usize, rank: usize) -> Result<Self> {
        if base_weight.len() != d_out * d_in {
            return Err(Error::ShapeMismatch {
                name: String::from("weight"),
                expected: vec![d_out, d_in],
                actual: base_weight.shape().to_vec(),
            });
        }
        if rank == 0 {
            return Err(Error::ConfigError(String::from("LoRA rank must be at least 1")));
        }

        let mut weight = base_weight.reshape(vec![d_out, d_in])?;
        weight.set_requires_grad(false);

        let lora_a = Tensor::from_fn(vec![rank, d_in], true, |i| (i as f32 * 0.1).sin() * 0.01);
        let lora_b = Tensor::from_fn(vec![d_out, rank], true, |_| 0.0);

        Ok(Self { weight, lora_a, lora_b, bias: None, d_out, d_in, rank })
    }

    /// Attach a bias of `d_out` values, stored with shape `[d_out]`
    pub fn with_bias(mut self, bias: Tensor) -> Result<Self> {
        if bias.len() != self.d_out {
            return Err(Error::ShapeMismatch {
                name: String::from("bias"),
                expected: vec![self.d_out],
                actual: bias.shape().to_vec(),
            });
        }
        self.bias = Some(bias.reshape(vec![self.d_out])?);
        Ok(self)
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub fn lora_a(&self) -> &Tensor {
        &self.lora_a
    }

    pub fn lora_b(&self) -> &Tensor {
        &self.lora_b
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn d_out(&self) -> usize {
        self.d_out
    }

    pub fn d_in(&self) -> usize {
        self.d_in
    }
}

impl Module for LoRALinear {
    fn kind(&self) -> ModuleKind {
        ModuleKind::LoRA
    }

    fn parameters(&self) -> Vec<(&str, &Tensor)> {
        let mut params = vec![("weight", &self.weight), ("lora_A", &self.lora_a), ("lora_B", &self.lora_b)];
        if let Some(bias) = &self.bias {
            params.push(("bias", bias));
        }
        params
    }

    fn parameters_mut(&mut self) -> Vec<(&str, &mut Tensor)> {
        let mut params = vec![
            ("weight", &mut self.weight),
            ("lora_A", &mut self.lora_a),
            ("lora_B", &mut self.lora_b),
        ];
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
