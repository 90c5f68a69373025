//! Pipeline Module - Orchestrators
//!
//! Batch and single-sample inference share `score_record`, so a manual entry
//! and a one-row upload with the same canonical values score identically.

pub mod batch;
pub mod single;
pub mod summary;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::logic::error::PipelineResult;
use crate::logic::features::{extract, CanonicalFeatureRecord, Disposition, FeatureValues};
use crate::logic::model::ModelHandle;
use crate::logic::verdict::{ConfidenceBucket, Label, Threshold, VerdictFragment};

pub use batch::{run_batch, BatchOptions, BatchOutcome, RowExclusion};
pub use single::{run_single, ManualParameters};
pub use summary::{BatchSummary, Evaluation};

/// Scored sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub id: String,
    pub label: Label,
    pub probability: f64,
    pub confidence: ConfidenceBucket,
    pub interpretation: String,
    /// Unscaled features the model saw, after imputation
    pub features: FeatureValues,
    pub imputed: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<Disposition>,
}

/// Extract → scale → classify → verdict, for one canonical record
pub fn score_record(
    handle: &ModelHandle,
    record: &CanonicalFeatureRecord,
    id: String,
    threshold: Threshold,
) -> PipelineResult<Verdict> {
    let extraction = extract(record)?;
    let probability = handle.score(&extraction.vector)?;
    let fragment = VerdictFragment::build(probability, threshold);

    Ok(Verdict {
        id,
        label: fragment.label,
        probability,
        confidence: fragment.confidence,
        interpretation: fragment.interpretation,
        features: extraction.vector.named(),
        imputed: extraction.imputed,
        ground_truth: record.label(),
    })
}
