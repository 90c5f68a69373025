//! Classifier Adapter
//!
//! Uniform `predict_proba` contract over algorithm families. Callers only see
//! `dyn Classifier`; artifacts pick the family through `ClassifierSpec`.

use serde::{Deserialize, Serialize};

use super::ensemble::{EnsembleClassifier, EnsembleSpec};
use super::neural::{NeuralClassifier, NeuralNetworkSpec};
use super::trees::GradientBoostedTrees;

/// Algorithm family of a trained classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierFamily {
    GradientBoostedTrees,
    NeuralNetwork,
    Ensemble,
}

impl ClassifierFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierFamily::GradientBoostedTrees => "gradient_boosting",
            ClassifierFamily::NeuralNetwork => "deep_learning",
            ClassifierFamily::Ensemble => "ensemble",
        }
    }
}

/// Scored probabilistic binary classifier.
///
/// Implementations hold no mutable state: the same input always yields the
/// same probability, and concurrent calls need no locking.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    fn family(&self) -> ClassifierFamily;

    /// Width of the (scaled) feature vector the classifier was trained on
    fn input_dim(&self) -> usize;

    /// Probability of the positive (planet) class, in [0, 1]
    fn predict_proba(&self, features: &[f64]) -> f64;

    /// Normalized per-feature importance, if the family can provide it
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Serialized classifier, tagged by family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ClassifierSpec {
    GradientBoostedTrees(GradientBoostedTrees),
    NeuralNetwork(NeuralNetworkSpec),
    Ensemble(EnsembleSpec),
}

impl ClassifierSpec {
    /// Validate structure against the feature width and build the runtime classifier
    pub fn build(self, input_dim: usize) -> Result<Box<dyn Classifier>, String> {
        match self {
            ClassifierSpec::GradientBoostedTrees(trees) => {
                trees.validate(input_dim)?;
                Ok(Box::new(trees.with_input_dim(input_dim)))
            }
            ClassifierSpec::NeuralNetwork(spec) => {
                Ok(Box::new(NeuralClassifier::from_spec(spec, input_dim)?))
            }
            ClassifierSpec::Ensemble(spec) => {
                Ok(Box::new(EnsembleClassifier::from_spec(spec, input_dim)?))
            }
        }
    }
}

/// Logistic link, stable for large |x|
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Scale importances so they sum to one; all-zero stays all-zero
pub(crate) fn normalize(mut values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in &mut values {
            *v /= total;
        }
    }
    values
}
