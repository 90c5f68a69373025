//! Verdict Builder
//!
//! Probability + threshold → label, confidence bucket and a fixed-template
//! interpretation. The bucket depends on the probability alone.

use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};

/// Default decision threshold
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Decision threshold, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> PipelineResult<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(PipelineError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Planet,
    FalsePositive,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Planet => "PLANET",
            Label::FalsePositive => "FALSE_POSITIVE",
        }
    }

    pub fn is_planet(&self) -> bool {
        matches!(self, Label::Planet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    /// Distance of the probability from the 0.5 boundary
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.8 || p <= 0.2 {
            ConfidenceBucket::High
        } else if (0.6..0.8).contains(&p) || (p > 0.2 && p <= 0.4) {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBucket::High => "HIGH",
            ConfidenceBucket::Medium => "MEDIUM",
            ConfidenceBucket::Low => "LOW",
        }
    }

    pub fn descriptor(&self) -> &'static str {
        match self {
            ConfidenceBucket::High => "strong signal",
            ConfidenceBucket::Medium => "borderline",
            ConfidenceBucket::Low => "likely noise",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictFragment {
    pub label: Label,
    pub confidence: ConfidenceBucket,
    pub interpretation: String,
}

impl VerdictFragment {
    pub fn build(probability: f64, threshold: Threshold) -> Self {
        let label = if probability >= threshold.value() {
            Label::Planet
        } else {
            Label::FalsePositive
        };
        let confidence = ConfidenceBucket::from_probability(probability);

        Self {
            label,
            confidence,
            interpretation: interpret(label, probability, confidence),
        }
    }
}

fn interpret(label: Label, probability: f64, confidence: ConfidenceBucket) -> String {
    let subject = match label {
        Label::Planet => "Likely planet",
        Label::FalsePositive => "Likely false positive",
    };
    format!(
        "{} ({:.1}% planet probability, {} confidence: {})",
        subject,
        probability * 100.0,
        confidence.as_str(),
        confidence.descriptor()
    )
}
