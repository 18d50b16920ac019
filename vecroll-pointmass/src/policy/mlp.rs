use anyhow::{bail, Result};
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use vecroll_core::{error::EvalError, record::Record, Configurable, Policy, RollingContext};

/// Weights of a fully connected layer, `weight[out][in]`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LinearConfig {
    /// Weight matrix, one row per output unit.
    pub weight: Vec<Vec<f32>>,

    /// Bias, one entry per output unit.
    pub bias: Vec<f32>,
}

/// Configuration of [`MlpPolicy`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MlpPolicyConfig {
    /// Layers from input to output.
    pub layers: Vec<LinearConfig>,
}

struct Linear {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Linear {
    fn build(config: LinearConfig) -> Result<Self> {
        let n_out = config.weight.len();
        let n_in = config.weight.first().map_or(0, |row| row.len());
        if n_out == 0 || n_in == 0 {
            bail!("Empty weight matrix");
        }
        if config.weight.iter().any(|row| row.len() != n_in) {
            bail!("Rows of a weight matrix differ in length");
        }
        if config.bias.len() != n_out {
            bail!("Bias of length {} for {} output units", config.bias.len(), n_out);
        }
        let weight = Array2::from_shape_vec((n_out, n_in), config.weight.concat())?;

        Ok(Self {
            weight,
            bias: Array1::from(config.bias),
        })
    }

    fn forward(&self, x: ArrayView2<f32>) -> Array2<f32> {
        x.dot(&self.weight.t()) + &self.bias
    }
}

/// Multilayer perceptron with ReLU hidden activations and tanh output.
///
/// The input of a query is the concatenation of the frames in the rolling
/// context, oldest first. Until the context is full, the oldest frame is repeated
/// to fill the window, so the input dimension is `window_size * enc_dim`.
pub struct MlpPolicy {
    layers: Vec<Linear>,
    context: RollingContext,
}

impl MlpPolicy {
    /// Dimension of the network input.
    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, |l| l.weight.ncols())
    }

    /// Dimension of the network output.
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, |l| l.weight.nrows())
    }

    /// Applies the network to a batch `(n, input_dim)`.
    pub fn forward(&self, x: ArrayView2<f32>) -> Array2<f32> {
        let n_layers = self.layers.len();
        let mut x = x.to_owned();
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x.view());
            if i != n_layers - 1 {
                x.mapv_inplace(|v| v.max(0.0));
            }
        }
        x.mapv_inplace(f32::tanh);
        x
    }

    fn stacked_frames(&self) -> Result<Array2<f32>> {
        let oldest = match self.context.oldest() {
            Some(frame) => frame.view(),
            None => bail!("Rolling context is empty"),
        };
        let n_pad = self.context.capacity() - self.context.len();
        let frames: Vec<ArrayView2<f32>> = std::iter::repeat(oldest)
            .take(n_pad)
            .chain(self.context.iter().map(|frame| frame.view()))
            .collect();
        Ok(concatenate(Axis(1), &frames)?)
    }
}

impl Configurable for MlpPolicy {
    type Config = MlpPolicyConfig;

    fn build(config: Self::Config) -> Result<Self> {
        let layers = config
            .layers
            .into_iter()
            .map(Linear::build)
            .collect::<Result<Vec<_>>>()?;
        if layers.is_empty() {
            bail!("MLP without layers");
        }
        for pair in layers.windows(2) {
            if pair[0].weight.nrows() != pair[1].weight.ncols() {
                bail!(
                    "Layer with {} outputs feeds a layer with {} inputs",
                    pair[0].weight.nrows(),
                    pair[1].weight.ncols()
                );
            }
        }

        Ok(Self {
            layers,
            context: RollingContext::new(1),
        })
    }
}

impl Policy for MlpPolicy {
    fn reset_context(&mut self, window_size: usize) {
        self.context.reset(window_size);
    }

    fn act(&mut self, enc_obs: &Array2<f32>) -> Result<(Array2<f32>, Record)> {
        self.context.push(enc_obs.clone());
        let x = self.stacked_frames()?;
        if x.ncols() != self.input_dim() {
            return Err(EvalError::ObsShape {
                expected: vec![x.nrows(), self.input_dim()],
                actual: x.shape().to_vec(),
            }
            .into());
        }
        Ok((self.forward(x.view()), Record::empty()))
    }
}
