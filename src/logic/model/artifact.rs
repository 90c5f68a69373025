//! On-disk model artifact (`<id>.model.json`)

use serde::{Deserialize, Serialize};

use super::classifier::ClassifierSpec;
use crate::logic::features::LayoutInfo;

/// Cross-validation summary recorded at training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub n_folds: u32,
    pub mean_recall: f64,
    pub std_recall: f64,
}

/// Held-out performance of the trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    #[serde(default)]
    pub roc_auc: Option<f64>,
    #[serde(default)]
    pub cross_validation: Option<CrossValidation>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub training_date: Option<String>,
    #[serde(default)]
    pub training_samples: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub id: String,
    pub name: String,
    /// Free-text description of the training data
    #[serde(default)]
    pub trained_on: String,
    pub feature_layout: LayoutInfo,
    /// Scaler file, relative to the artifact's directory. Absent = raw features.
    #[serde(default)]
    pub scaler: Option<String>,
    pub metrics: MetricsSnapshot,
    pub classifier: ClassifierSpec,
}
