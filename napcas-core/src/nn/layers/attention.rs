use crate::error::NapcasError;
use crate::nn::layers::linear::Linear;
use crate::nn::module::{children_parameters, Module};
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::Rng;

/// Multi-head scaled dot-product attention over `[seq_len, batch, d_model]`.
///
/// Each head attends with its own `d_model / num_heads` slice of the
/// projected queries, keys and values; the heads are concatenated and mixed
/// by an output projection.
#[derive(Debug)]
pub struct MultiHeadAttention {
    q_proj: Linear,
    k_proj: Linear,
    v_proj: Linear,
    out_proj: Linear,
    d_model: usize,
    num_heads: usize,
}

impl MultiHeadAttention {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` unless `num_heads > 0` and
    /// `d_model % num_heads == 0`.
    pub fn new<R: Rng + ?Sized>(
        d_model: usize,
        num_heads: usize,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        if num_heads == 0 || d_model == 0 || d_model % num_heads != 0 {
            return Err(NapcasError::ConfigurationError(format!(
                "d_model ({}) must be a positive multiple of num_heads ({})",
                d_model, num_heads
            )));
        }
        Ok(MultiHeadAttention {
            q_proj: Linear::new(d_model, d_model, true, rng)?,
            k_proj: Linear::new(d_model, d_model, true, rng)?,
            v_proj: Linear::new(d_model, d_model, true, rng)?,
            out_proj: Linear::new(d_model, d_model, true, rng)?,
            d_model,
            num_heads,
        })
    }

    pub fn d_model(&self) -> usize {
        self.d_model
    }

    pub fn num_heads(&self) -> usize {
        self.num_heads
    }

    fn head_dim(&self) -> usize {
        self.d_model / self.num_heads
    }

    /// `[len, batch, d_model]` -> `[batch * heads, len, head_dim]`
    fn split_heads(&self, x: &Tensor, len: usize, batch: usize) -> Result<Tensor, NapcasError> {
        x.reshape(&[len, batch * self.num_heads, self.head_dim()])?
            .permute(&[1, 0, 2])
    }

    fn check_input(&self, t: &Tensor, what: &str) -> Result<(usize, usize), NapcasError> {
        match t.shape().as_slice() {
            [len, batch, d] if *d == self.d_model => Ok((*len, *batch)),
            other => Err(NapcasError::ShapeMismatch {
                expected: vec![0, 0, self.d_model],
                actual: other.to_vec(),
                operation: format!("multi-head attention ({})", what),
            }),
        }
    }

    /// Attends `query` `[L, B, D]` over `key`/`value` `[S, B, D]`, returning `[L, B, D]`.
    ///
    /// # Errors
    /// `NapcasError::ShapeMismatch` if an input is not 3-D with `d_model`
    /// features, the batch sizes differ or key and value lengths differ.
    pub fn forward_qkv(
        &self,
        query: &Tensor,
        key: &Tensor,
        value: &Tensor,
    ) -> Result<Tensor, NapcasError> {
        let (q_len, batch) = self.check_input(query, "query")?;
        let (k_len, k_batch) = self.check_input(key, "key")?;
        let (v_len, v_batch) = self.check_input(value, "value")?;
        if k_batch != batch || v_batch != batch || v_len != k_len {
            return Err(NapcasError::ShapeMismatch {
                expected: vec![k_len, batch, self.d_model],
                actual: value.shape(),
                operation: "multi-head attention (key/value)".to_string(),
            });
        }

        let q = self.split_heads(&self.q_proj.forward(query)?, q_len, batch)?;
        let k = self.split_heads(&self.k_proj.forward(key)?, k_len, batch)?;
        let v = self.split_heads(&self.v_proj.forward(value)?, k_len, batch)?;

        let scale = 1.0 / (self.head_dim() as f32).sqrt();
        let scores = q.matmul(&k.transpose(1, 2)?)?.mul_scalar(scale)?;
        let weights = scores.softmax(2)?;
        let context = weights
            .matmul(&v)?
            .permute(&[1, 0, 2])?
            .reshape(&[q_len, batch, self.d_model])?;
        self.out_proj.forward(&context)
    }
}

impl Module for MultiHeadAttention {
    /// Self-attention: `forward_qkv(x, x, x)`.
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        self.forward_qkv(input, input, input)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        children_parameters(self)
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        vec![
            ("q_proj".to_string(), &self.q_proj as &dyn Module),
            ("k_proj".to_string(), &self.k_proj),
            ("v_proj".to_string(), &self.v_proj),
            ("out_proj".to_string(), &self.out_proj),
        ]
    }
}

#[cfg(test)]
#[path = "attention_test.rs"]
mod tests;
