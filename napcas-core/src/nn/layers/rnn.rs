//! Recurrent layers over `[seq_len, batch, input_size]` sequences.
//!
//! Every layer holds one set of weights per stacked layer and applies it at
//! each time step, so the unrolled graph shares those parameters and
//! backpropagation through time is the ordinary backward pass.

use crate::error::NapcasError;
use crate::nn::init::uniform_;
use crate::nn::layers::linear::linear_forward;
use crate::nn::module::Module;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::Rng;

/// Weights of one stacked layer, with `gates` blocks of `hidden_size` rows.
#[derive(Debug)]
struct LayerWeights {
    w_ih: Parameter,
    w_hh: Parameter,
    b_ih: Parameter,
    b_hh: Parameter,
}

impl LayerWeights {
    fn new<R: Rng + ?Sized>(
        gates: usize,
        input_size: usize,
        hidden_size: usize,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        let bound = 1.0 / (hidden_size as f32).sqrt();
        let init = |shape: &[usize], rng: &mut R| -> Result<Parameter, NapcasError> {
            let t = Tensor::zeros(shape)?;
            uniform_(&t, -bound, bound, rng)?;
            Ok(Parameter::new(t))
        };
        Ok(LayerWeights {
            w_ih: init(&[gates * hidden_size, input_size], rng)?,
            w_hh: init(&[gates * hidden_size, hidden_size], rng)?,
            b_ih: init(&[gates * hidden_size], rng)?,
            b_hh: init(&[gates * hidden_size], rng)?,
        })
    }

    fn input_part(&self, x: &Tensor) -> Result<Tensor, NapcasError> {
        linear_forward(x, &self.w_ih, Some(&self.b_ih))
    }

    fn hidden_part(&self, h: &Tensor) -> Result<Tensor, NapcasError> {
        linear_forward(h, &self.w_hh, Some(&self.b_hh))
    }

    fn named(&self, layer: usize) -> Vec<(String, Parameter)> {
        vec![
            (format!("weight_ih_l{}", layer), self.w_ih.clone()),
            (format!("weight_hh_l{}", layer), self.w_hh.clone()),
            (format!("bias_ih_l{}", layer), self.b_ih.clone()),
            (format!("bias_hh_l{}", layer), self.b_hh.clone()),
        ]
    }
}

/// Layer stack shared by the three cell types.
#[derive(Debug)]
struct RecurrentStack {
    layers: Vec<LayerWeights>,
    input_size: usize,
    hidden_size: usize,
    name: &'static str,
}

impl RecurrentStack {
    fn new<R: Rng + ?Sized>(
        name: &'static str,
        gates: usize,
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        if input_size == 0 || hidden_size == 0 || num_layers == 0 {
            return Err(NapcasError::ConfigurationError(format!(
                "{} sizes must be positive (input_size={}, hidden_size={}, num_layers={})",
                name, input_size, hidden_size, num_layers
            )));
        }
        let layers = (0..num_layers)
            .map(|l| {
                let in_size = if l == 0 { input_size } else { hidden_size };
                LayerWeights::new(gates, in_size, hidden_size, rng)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RecurrentStack {
            layers,
            input_size,
            hidden_size,
            name,
        })
    }

    /// Splits `[seq, batch, input]` into `seq` tensors of shape `[batch, input]`.
    fn time_steps(&self, input: &Tensor) -> Result<(Vec<Tensor>, usize), NapcasError> {
        let shape = input.shape();
        let (seq_len, batch) = match shape.as_slice() {
            [s, b, i] if *i == self.input_size => (*s, *b),
            _ => {
                return Err(NapcasError::ShapeMismatch {
                    expected: vec![0, 0, self.input_size],
                    actual: shape.clone(),
                    operation: format!("{} (input must be [seq_len, batch, input_size])", self.name),
                })
            }
        };
        let steps = (0..seq_len)
            .map(|t| input.narrow(0, t, 1)?.reshape(&[batch, self.input_size]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((steps, batch))
    }

    /// Per-layer `[batch, hidden]` states from an optional `[layers, batch, hidden]` tensor.
    fn initial_state(&self, state: Option<&Tensor>, batch: usize) -> Result<Vec<Tensor>, NapcasError> {
        let num_layers = self.layers.len();
        match state {
            None => (0..num_layers)
                .map(|_| Tensor::zeros(&[batch, self.hidden_size]))
                .collect(),
            Some(s) => {
                let expected = vec![num_layers, batch, self.hidden_size];
                if s.shape() != expected {
                    return Err(NapcasError::ShapeMismatch {
                        expected,
                        actual: s.shape(),
                        operation: format!("{} (initial state)", self.name),
                    });
                }
                (0..num_layers)
                    .map(|l| s.narrow(0, l, 1)?.reshape(&[batch, self.hidden_size]))
                    .collect()
            }
        }
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(l, w)| w.named(l))
            .collect()
    }
}

/// Elman RNN: `h_t = tanh(W_ih x_t + b_ih + W_hh h_(t-1) + b_hh)`.
#[derive(Debug)]
pub struct Rnn {
    stack: RecurrentStack,
}

impl Rnn {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if a size is zero.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        Ok(Rnn {
            stack: RecurrentStack::new("RNN", 1, input_size, hidden_size, num_layers, rng)?,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.stack.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.stack.layers.len()
    }

    /// Runs the sequence from `h0` (zeros when `None`, else `[layers, batch, hidden]`).
    ///
    /// Returns the last layer's outputs `[seq, batch, hidden]` and the final
    /// hidden state `[layers, batch, hidden]`.
    pub fn forward_with_state(
        &self,
        input: &Tensor,
        h0: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor), NapcasError> {
        let (steps, batch) = self.stack.time_steps(input)?;
        let mut h = self.stack.initial_state(h0, batch)?;
        let mut outputs = Vec::with_capacity(steps.len());
        for x_t in steps {
            let mut layer_input = x_t;
            for (l, w) in self.stack.layers.iter().enumerate() {
                let next = w
                    .input_part(&layer_input)?
                    .add(&w.hidden_part(&h[l])?)?
                    .tanh()?;
                h[l] = next.clone();
                layer_input = next;
            }
            outputs.push(layer_input);
        }
        Ok((Tensor::stack(&outputs, 0)?, Tensor::stack(&h, 0)?))
    }
}

impl Module for Rnn {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        Ok(self.forward_with_state(input, None)?.0)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        self.stack.named_parameters()
    }
}

/// Long short-term memory with input, forget, cell and output gates (in that
/// order along the gate axis of the weights).
#[derive(Debug)]
pub struct Lstm {
    stack: RecurrentStack,
}

impl Lstm {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if a size is zero.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        Ok(Lstm {
            stack: RecurrentStack::new("LSTM", 4, input_size, hidden_size, num_layers, rng)?,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.stack.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.stack.layers.len()
    }

    /// Runs the sequence from `(h0, c0)`, zeros when `None`.
    ///
    /// Returns the outputs `[seq, batch, hidden]` and the final `(h, c)`, each
    /// `[layers, batch, hidden]`.
    pub fn forward_with_state(
        &self,
        input: &Tensor,
        state: Option<(&Tensor, &Tensor)>,
    ) -> Result<(Tensor, (Tensor, Tensor)), NapcasError> {
        let (steps, batch) = self.stack.time_steps(input)?;
        let mut h = self.stack.initial_state(state.map(|s| s.0), batch)?;
        let mut c = self.stack.initial_state(state.map(|s| s.1), batch)?;
        let hs = self.stack.hidden_size;
        let mut outputs = Vec::with_capacity(steps.len());
        for x_t in steps {
            let mut layer_input = x_t;
            for (l, w) in self.stack.layers.iter().enumerate() {
                let gates = w.input_part(&layer_input)?.add(&w.hidden_part(&h[l])?)?;
                let i = gates.narrow(1, 0, hs)?.sigmoid()?;
                let f = gates.narrow(1, hs, hs)?.sigmoid()?;
                let g = gates.narrow(1, 2 * hs, hs)?.tanh()?;
                let o = gates.narrow(1, 3 * hs, hs)?.sigmoid()?;
                c[l] = f.mul(&c[l])?.add(&i.mul(&g)?)?;
                h[l] = o.mul(&c[l].tanh()?)?;
                layer_input = h[l].clone();
            }
            outputs.push(layer_input);
        }
        Ok((
            Tensor::stack(&outputs, 0)?,
            (Tensor::stack(&h, 0)?, Tensor::stack(&c, 0)?),
        ))
    }
}

impl Module for Lstm {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        Ok(self.forward_with_state(input, None)?.0)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        self.stack.named_parameters()
    }
}

/// Gated recurrent unit with reset, update and candidate blocks.
///
/// `n = tanh(W_in x + b_in + r * (W_hn h + b_hn))`, `h' = (1 - z) * n + z * h`.
#[derive(Debug)]
pub struct Gru {
    stack: RecurrentStack,
}

impl Gru {
    /// # Errors
    /// Returns `NapcasError::ConfigurationError` if a size is zero.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        rng: &mut R,
    ) -> Result<Self, NapcasError> {
        Ok(Gru {
            stack: RecurrentStack::new("GRU", 3, input_size, hidden_size, num_layers, rng)?,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.stack.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.stack.layers.len()
    }

    /// Same contract as [`Rnn::forward_with_state`].
    pub fn forward_with_state(
        &self,
        input: &Tensor,
        h0: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor), NapcasError> {
        let (steps, batch) = self.stack.time_steps(input)?;
        let mut h = self.stack.initial_state(h0, batch)?;
        let hs = self.stack.hidden_size;
        let mut outputs = Vec::with_capacity(steps.len());
        for x_t in steps {
            let mut layer_input = x_t;
            for (l, w) in self.stack.layers.iter().enumerate() {
                let gi = w.input_part(&layer_input)?;
                let gh = w.hidden_part(&h[l])?;
                let r = gi.narrow(1, 0, hs)?.add(&gh.narrow(1, 0, hs)?)?.sigmoid()?;
                let z = gi.narrow(1, hs, hs)?.add(&gh.narrow(1, hs, hs)?)?.sigmoid()?;
                let n = gi
                    .narrow(1, 2 * hs, hs)?
                    .add(&r.mul(&gh.narrow(1, 2 * hs, hs)?)?)?
                    .tanh()?;
                // (1 - z) * n + z * h == n + z * (h - n)
                let next = n.add(&z.mul(&h[l].sub(&n)?)?)?;
                h[l] = next.clone();
                layer_input = next;
            }
            outputs.push(layer_input);
        }
        Ok((Tensor::stack(&outputs, 0)?, Tensor::stack(&h, 0)?))
    }
}

impl Module for Gru {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NapcasError> {
        Ok(self.forward_with_state(input, None)?.0)
    }

    fn named_parameters(&self) -> Vec<(String, Parameter)> {
        self.stack.named_parameters()
    }
}

#[cfg(test)]
#[path = "rnn_test.rs"]
mod tests;
