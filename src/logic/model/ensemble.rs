//! Weighted ensemble of member classifiers

use serde::{Deserialize, Serialize};

use super::classifier::{normalize, Classifier, ClassifierFamily, ClassifierSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMember {
    pub weight: f64,
    pub model: ClassifierSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleSpec {
    pub members: Vec<EnsembleMember>,
}

#[derive(Debug)]
pub struct EnsembleClassifier {
    members: Vec<(f64, Box<dyn Classifier>)>,
    total_weight: f64,
    input_dim: usize,
}

impl EnsembleClassifier {
    pub fn from_spec(spec: EnsembleSpec, input_dim: usize) -> Result<Self, String> {
        if spec.members.is_empty() {
            return Err("ensemble has no members".to_string());
        }

        let mut members = Vec::with_capacity(spec.members.len());
        for (i, member) in spec.members.into_iter().enumerate() {
            if !member.weight.is_finite() || member.weight < 0.0 {
                return Err(format!("member {} has invalid weight {}", i, member.weight));
            }
            let classifier = member
                .model
                .build(input_dim)
                .map_err(|e| format!("member {}: {}", i, e))?;
            members.push((member.weight, classifier));
        }

        let total_weight: f64 = members.iter().map(|(w, _)| w).sum();
        if total_weight <= 0.0 {
            return Err("ensemble weights sum to zero".to_string());
        }

        Ok(Self { members, total_weight, input_dim })
    }
}

impl Classifier for EnsembleClassifier {
    fn family(&self) -> ClassifierFamily {
        ClassifierFamily::Ensemble
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        let weighted: f64 = self
            .members
            .iter()
            .map(|(w, m)| w * m.predict_proba(features))
            .sum();
        weighted / self.total_weight
    }

    /// Weighted average over the members that report importances
    fn feature_importances(&self) -> Option<Vec<f64>> {
        let mut totals = vec![0.0; self.input_dim];
        let mut any = false;
        for (weight, member) in &self.members {
            if let Some(importances) = member.feature_importances() {
                any = true;
                for (t, v) in totals.iter_mut().zip(importances) {
                    *t += weight * v;
                }
            }
        }
        any.then(|| normalize(totals))
    }
}
