//! Batch aggregates

use std::collections::BTreeMap;

use serde::Serialize;

use super::batch::RowExclusion;
use super::Verdict;
use crate::logic::error::ErrorKind;

/// Probabilities strictly above this count as high confidence in the summary
pub const HIGH_CONFIDENCE_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub labeled_samples: usize,
    pub correct: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub predicted_planets: usize,
    pub false_positives: usize,
    pub mean_probability: f64,
    pub high_confidence_count: usize,
    pub excluded_rows: usize,
    pub exclusions_by_kind: BTreeMap<ErrorKind, usize>,
    pub blank_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

impl BatchSummary {
    pub fn compute(verdicts: &[Verdict], exclusions: &[RowExclusion], blank_rows: usize) -> Self {
        let predicted_planets = verdicts.iter().filter(|v| v.label.is_planet()).count();
        let mean_probability = if verdicts.is_empty() {
            0.0
        } else {
            verdicts.iter().map(|v| v.probability).sum::<f64>() / verdicts.len() as f64
        };

        let mut exclusions_by_kind = BTreeMap::new();
        for exclusion in exclusions {
            *exclusions_by_kind.entry(exclusion.kind).or_insert(0) += 1;
        }

        Self {
            predicted_planets,
            false_positives: verdicts.len() - predicted_planets,
            mean_probability,
            high_confidence_count: verdicts
                .iter()
                .filter(|v| v.probability > HIGH_CONFIDENCE_PROBABILITY)
                .count(),
            excluded_rows: exclusions.len(),
            exclusions_by_kind,
            blank_rows,
            evaluation: evaluate(verdicts),
        }
    }
}

/// Agreement with catalog dispositions; candidates count as planets
fn evaluate(verdicts: &[Verdict]) -> Option<Evaluation> {
    let mut labeled = 0;
    let mut correct = 0;
    for verdict in verdicts {
        if let Some(truth) = verdict.ground_truth.and_then(|d| d.is_planet()) {
            labeled += 1;
            if truth == verdict.label.is_planet() {
                correct += 1;
            }
        }
    }
    (labeled > 0).then(|| Evaluation {
        labeled_samples: labeled,
        correct,
        accuracy: correct as f64 / labeled as f64,
    })
}
