//! Pre-trained feed-forward classification network
//!
//! Networks are stored as JSON:
//!
//! ```json
//! {
//!   "layers": [
//!     { "weights": [[0.1, 0.2], [0.3, 0.4]], "biases": [0.0, 0.0], "activation": "sigmoid" }
//!   ]
//! }
//! ```
//!
//! `weights` has one row per output neuron and one column per input.

use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::{GmailError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    Linear,
    Softmax,
}

impl Activation {
    fn apply(self, mut z: Array1<f32>) -> Array1<f32> {
        match self {
            Activation::Sigmoid => z.mapv_inplace(|x| 1.0 / (1.0 + (-x).exp())),
            Activation::Tanh => z.mapv_inplace(f32::tanh),
            Activation::Relu => z.mapv_inplace(|x| x.max(0.0)),
            Activation::Linear => {}
            Activation::Softmax => {
                let max = z.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
                z.mapv_inplace(|x| (x - max).exp());
                let total = z.sum();
                z /= total;
            }
        }
        z
    }
}

/// One fully connected layer: `activation(W·x + b)`
#[derive(Debug, Clone)]
pub struct Layer {
    weights: Array2<f32>,
    biases: Array1<f32>,
    activation: Activation,
}

impl Layer {
    pub fn new(weights: Array2<f32>, biases: Array1<f32>, activation: Activation) -> Result<Self> {
        if weights.nrows() != biases.len() {
            return Err(GmailError::ModelError(format!(
                "Layer has {} weight rows but {} biases",
                weights.nrows(),
                biases.len()
            )));
        }
        Ok(Self {
            weights,
            biases,
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    fn forward(&self, input: ArrayView1<'_, f32>) -> Array1<f32> {
        self.activation.apply(self.weights.dot(&input) + &self.biases)
    }
}

#[derive(Debug, Deserialize)]
struct NetworkFile {
    layers: Vec<LayerFile>,
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
    activation: Activation,
}

impl LayerFile {
    fn into_layer(self, position: usize) -> Result<Layer> {
        let rows = self.weights.len();
        let cols = self.weights.first().map_or(0, Vec::len);
        if self.weights.iter().any(|row| row.len() != cols) {
            return Err(GmailError::ModelError(format!(
                "Layer {} has ragged weight rows",
                position
            )));
        }
        let weights = Array2::from_shape_vec((rows, cols), self.weights.concat())
            .map_err(|e| GmailError::ModelError(format!("Layer {}: {}", position, e)))?;
        Layer::new(weights, Array1::from(self.biases), self.activation)
    }
}

/// Stack of layers applied in order
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Chain layers, checking each output feeds the next input
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(GmailError::ModelError("Network has no layers".to_string()));
        }
        for (position, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(GmailError::ModelError(format!(
                    "Layer {} outputs {} values but layer {} expects {}",
                    position,
                    pair[0].output_size(),
                    position + 1,
                    pair[1].input_size()
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Load a network from its JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            GmailError::ModelError(format!("Failed to read network {:?}: {}", path, e))
        })?;
        let network = Self::from_json(&content)?;
        info!(
            "Loaded network with {} layers ({} inputs, {} outputs) from {:?}",
            network.layers.len(),
            network.input_size(),
            network.output_size(),
            path
        );
        Ok(network)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: NetworkFile = serde_json::from_str(json)?;
        let layers = file
            .layers
            .into_iter()
            .enumerate()
            .map(|(position, layer)| layer.into_layer(position))
            .collect::<Result<Vec<_>>>()?;
        Self::new(layers)
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// Run `input` through every layer
    pub fn feed_forward(&self, input: ArrayView1<'_, f32>) -> Result<Array1<f32>> {
        if input.len() != self.input_size() {
            return Err(GmailError::ClassificationError(format!(
                "Network expects {} inputs, got {}",
                self.input_size(),
                input.len()
            )));
        }

        let mut activations = self.layers[0].forward(input);
        for layer in &self.layers[1..] {
            activations = layer.forward(activations.view());
        }
        Ok(activations)
    }
}
