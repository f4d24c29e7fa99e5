//! Parameter tensor with a trainability flag

use crate::{Error, Result};
use ndarray::Array1;

/// Flat f32 tensor with a logical shape and a `requires_grad` flag
///
/// Storage is always a 1D array; `shape` records how the values are laid out
/// (row-major) so that snapshots can be persisted with their real dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: Array1<f32>,
    shape: Vec<usize>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a tensor from raw data
    pub fn new(data: Array1<f32>, requires_grad: bool) -> Self {
        let shape = vec![data.len()];
        Self { data, shape, requires_grad }
    }

    /// Create a 1D tensor from a vector
    pub fn from_vec(data: Vec<f32>, requires_grad: bool) -> Self {
        Self::new(Array1::from_vec(data), requires_grad)
    }

    /// Create a tensor with an explicit shape
    ///
    /// Fails with [`Error::ShapeMismatch`] when the product of `shape` does
    /// not equal `data.len()`.
    pub fn with_shape(data: Vec<f32>, shape: Vec<usize>, requires_grad: bool) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if numel != data.len() {
            return Err(Error::ShapeMismatch {
                name: String::from("<tensor>"),
                expected: shape,
                actual: vec![data.len()],
            });
        }
        Ok(Self { data: Array1::from_vec(data), shape, requires_grad })
    }

    /// Create a tensor of the given shape with `f(flat_index)` as values
    pub fn from_fn<F>(shape: Vec<usize>, requires_grad: bool, f: F) -> Self
    where
        F: FnMut(usize) -> f32,
    {
        let numel: usize = shape.iter().product();
        let data = (0..numel).map(f).collect::<Vec<f32>>();
        Self { data: Array1::from_vec(data), shape, requires_grad }
    }

    /// Zero-filled 1D tensor
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::zeros(len), requires_grad)
    }

    /// Reinterpret the tensor with a new shape of the same size
    pub fn reshape(mut self, shape: Vec<usize>) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if numel != self.len() {
            return Err(Error::ShapeMismatch {
                name: String::from("<tensor>"),
                expected: shape,
                actual: self.shape,
            });
        }
        self.shape = shape;
        Ok(self)
    }

    pub fn data(&self) -> &Array1<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array1<f32> {
        &mut self.data
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether this tensor participates in gradient updates
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }

    /// Values as a contiguous slice
    pub fn as_slice(&self) -> &[f32] {
        // Array1 built from Vec or zeros is always standard layout
        self.data.as_slice().unwrap_or(&[])
    }
}
