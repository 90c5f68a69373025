//! Dense feed-forward network with a single logistic output

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::classifier::{sigmoid, Classifier, ClassifierFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Tanh,
    Identity,
}

impl Activation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Identity => x,
        }
    }
}

/// One layer as exported: `weights[out][in]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralNetworkSpec {
    /// The last layer must have one unit; its output is treated as a logit
    pub layers: Vec<DenseLayerSpec>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

#[derive(Debug, Clone)]
pub struct NeuralClassifier {
    layers: Vec<DenseLayer>,
    input_dim: usize,
}

impl NeuralClassifier {
    pub fn from_spec(spec: NeuralNetworkSpec, input_dim: usize) -> Result<Self, String> {
        if spec.layers.is_empty() {
            return Err("network has no layers".to_string());
        }

        let mut width = input_dim;
        let mut layers = Vec::with_capacity(spec.layers.len());

        for (i, layer) in spec.layers.into_iter().enumerate() {
            let rows = layer.weights.len();
            if rows == 0 || rows != layer.bias.len() {
                return Err(format!(
                    "layer {}: {} weight rows but {} biases",
                    i,
                    rows,
                    layer.bias.len()
                ));
            }
            if let Some(row) = layer.weights.iter().find(|r| r.len() != width) {
                return Err(format!(
                    "layer {}: expected {} inputs per unit, found {}",
                    i,
                    width,
                    row.len()
                ));
            }

            let flat: Vec<f64> = layer.weights.into_iter().flatten().collect();
            if flat.iter().chain(&layer.bias).any(|v| !v.is_finite()) {
                return Err(format!("layer {}: non-finite parameters", i));
            }

            let weights = Array2::from_shape_vec((rows, width), flat)
                .map_err(|e| format!("layer {}: {}", i, e))?;

            layers.push(DenseLayer {
                weights,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
            width = rows;
        }

        if width != 1 {
            return Err(format!("output layer must have 1 unit, has {}", width));
        }

        Ok(Self { layers, input_dim })
    }

    fn logit(&self, features: &[f64]) -> f64 {
        let mut x = Array1::from(features.to_vec());
        for layer in &self.layers {
            x = layer.weights.dot(&x) + &layer.bias;
            x.mapv_inplace(|v| layer.activation.apply(v));
        }
        x[0]
    }
}

impl Classifier for NeuralClassifier {
    fn family(&self) -> ClassifierFamily {
        ClassifierFamily::NeuralNetwork
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.logit(features))
    }
}
