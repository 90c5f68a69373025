//! Prediction payloads

use serde::{Deserialize, Serialize};

use crate::logic::features::{Disposition, FeatureValues};
use crate::logic::mission::MissionTag;
use crate::logic::pipeline::{BatchOutcome, BatchSummary, ManualParameters, RowExclusion, Verdict};
use crate::logic::verdict::{ConfidenceBucket, Label};

#[derive(Debug, Serialize)]
pub struct PredictionItem {
    pub id: String,
    pub prediction: Label,
    pub probability: f64,
    pub confidence: ConfidenceBucket,
    pub features: FeatureValues,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imputed: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<Disposition>,
}

impl From<Verdict> for PredictionItem {
    fn from(v: Verdict) -> Self {
        Self {
            id: v.id,
            prediction: v.label,
            probability: v.probability,
            confidence: v.confidence,
            features: v.features,
            imputed: v.imputed,
            ground_truth: v.ground_truth,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub model_used: String,
    pub mission: MissionTag,
    pub threshold: f64,
    pub total_samples: usize,
    pub predictions: Vec<PredictionItem>,
    pub summary: BatchSummary,
    pub exclusions: Vec<RowExclusion>,
    pub truncated: bool,
    pub processing_time_ms: f64,
}

impl PredictResponse {
    pub fn new(outcome: BatchOutcome, processing_time_ms: f64) -> Self {
        Self {
            success: true,
            model_used: outcome.model_id,
            mission: outcome.mission,
            threshold: outcome.threshold.value(),
            total_samples: outcome.verdicts.len(),
            predictions: outcome.verdicts.into_iter().map(PredictionItem::from).collect(),
            summary: outcome.summary,
            exclusions: outcome.exclusions,
            truncated: outcome.truncated,
            processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualPredictRequest {
    #[serde(flatten)]
    pub parameters: ManualParameters,
    pub model: Option<String>,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ManualPredictResponse {
    pub success: bool,
    pub prediction: Label,
    pub probability: f64,
    pub confidence: ConfidenceBucket,
    pub model_used: String,
    pub threshold: f64,
    pub features_used: FeatureValues,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imputed: Vec<&'static str>,
    pub interpretation: String,
}

impl ManualPredictResponse {
    pub fn new(verdict: Verdict, model_used: String, threshold: f64) -> Self {
        Self {
            success: true,
            prediction: verdict.label,
            probability: verdict.probability,
            confidence: verdict.confidence,
            model_used,
            threshold,
            features_used: verdict.features,
            imputed: verdict.imputed,
            interpretation: verdict.interpretation,
        }
    }
}
