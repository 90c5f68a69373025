//! Feature Scaling
//!
//! Applies statistics fitted at training time. Scalers are loaded from the
//! JSON artifact written next to each model; nothing is fitted at inference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Fitting method the statistics came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    /// center = median, scale = interquartile range
    Robust,
    /// center = mean, scale = standard deviation
    Standard,
}

/// Fitted scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub method: ScalingMethod,
    pub center: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScalerLoadError {
    #[error("failed to read scaler {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("failed to parse scaler {path}: {source}")]
    Json { path: String, source: serde_json::Error },
    #[error("scaler {path} is inconsistent: {reason}")]
    Invalid { path: String, reason: String },
}

impl FeatureScaler {
    pub fn new(method: ScalingMethod, center: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { method, center, scale, feature_names: None }
    }

    /// Load fitted statistics from disk
    pub fn load(path: &Path) -> Result<Self, ScalerLoadError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| ScalerLoadError::Io {
            path: display.clone(),
            source,
        })?;
        let scaler: FeatureScaler = serde_json::from_slice(&bytes).map_err(|source| {
            ScalerLoadError::Json { path: display.clone(), source }
        })?;
        scaler
            .check()
            .map_err(|reason| ScalerLoadError::Invalid { path: display, reason })?;
        Ok(scaler)
    }

    /// Structural consistency of the fitted statistics
    pub fn check(&self) -> Result<(), String> {
        if self.center.len() != self.scale.len() {
            return Err(format!(
                "center has {} entries but scale has {}",
                self.center.len(),
                self.scale.len()
            ));
        }
        if self.center.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("statistics contain non-finite values".to_string());
        }
        if self.scale.iter().any(|s| *s < 0.0) {
            return Err("scale contains negative values".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.center.len() {
                return Err(format!(
                    "{} feature names for {} fitted features",
                    names.len(),
                    self.center.len()
                ));
            }
        }
        Ok(())
    }

    /// Number of features the scaler was fitted on
    pub fn dimension(&self) -> usize {
        self.center.len()
    }

    /// Scale a feature vector. The input is not modified.
    pub fn transform(&self, vector: &FeatureVector) -> PipelineResult<FeatureVector> {
        self.ensure_dimension(vector.len())?;

        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, v) in vector.values.iter().enumerate() {
            values[i] = (v - self.center[i]) / effective_scale(self.scale[i]);
        }

        Ok(FeatureVector {
            version: vector.version,
            layout_hash: vector.layout_hash,
            values,
        })
    }

    /// Undo `transform` (for interpretation of scaled values)
    pub fn inverse_transform(&self, vector: &FeatureVector) -> PipelineResult<FeatureVector> {
        self.ensure_dimension(vector.len())?;

        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, v) in vector.values.iter().enumerate() {
            values[i] = v * effective_scale(self.scale[i]) + self.center[i];
        }

        Ok(FeatureVector {
            version: vector.version,
            layout_hash: vector.layout_hash,
            values,
        })
    }

    fn ensure_dimension(&self, actual: usize) -> PipelineResult<()> {
        if actual != self.dimension() {
            return Err(PipelineError::ScalerMismatch {
                expected: self.dimension(),
                actual,
            });
        }
        Ok(())
    }
}

/// Constant features were fitted with zero spread; divide by one instead.
fn effective_scale(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

/// Scaling step attached to a model
#[derive(Debug, Clone, PartialEq)]
pub enum Scaling {
    /// Model was trained on raw features
    PassThrough,
    Fitted(FeatureScaler),
}

impl Scaling {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Scaling::PassThrough)
    }

    pub fn scaler(&self) -> Option<&FeatureScaler> {
        match self {
            Scaling::PassThrough => None,
            Scaling::Fitted(scaler) => Some(scaler),
        }
    }

    pub fn apply(&self, vector: &FeatureVector) -> PipelineResult<FeatureVector> {
        match self {
            Scaling::PassThrough => Ok(vector.clone()),
            Scaling::Fitted(scaler) => scaler.transform(vector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robust() -> FeatureScaler {
        FeatureScaler::new(
            ScalingMethod::Robust,
            vec![10.0, 2.0, 3.0, 500.0, 5600.0],
            vec![20.0, 2.0, 2.0, 1000.0, 0.0],
        )
    }

    #[test]
    fn test_transform() {
        let vector = FeatureVector::from_values([30.0, 4.0, 3.0, 1500.0, 6000.0]);
        let scaled = robust().transform(&vector).unwrap();
        assert_eq!(scaled.values, [1.0, 1.0, 0.0, 1.0, 400.0]);
        assert_eq!(scaled.layout_hash, vector.layout_hash);
    }

    #[test]
    fn test_transform_does_not_mutate_input() {
        let vector = FeatureVector::from_values([30.0, 4.0, 3.0, 1500.0, 6000.0]);
        let before = vector.clone();
        let _ = robust().transform(&vector).unwrap();
        assert_eq!(vector, before);
    }

    #[test]
    fn test_inverse_transform() {
        let scaler = robust();
        let vector = FeatureVector::from_values([12.5, 0.3, 9.0, 42.0, 3100.0]);
        let back = scaler.inverse_transform(&scaler.transform(&vector).unwrap()).unwrap();
        for (a, b) in back.values.iter().zip(vector.values.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let scaler = FeatureScaler::new(ScalingMethod::Standard, vec![0.0; 3], vec![1.0; 3]);
        let vector = FeatureVector::from_values([1.0; FEATURE_COUNT]);
        let err = scaler.transform(&vector).unwrap_err();
        assert_eq!(err, PipelineError::ScalerMismatch { expected: 3, actual: FEATURE_COUNT });
    }

    #[test]
    fn test_check_rejects_inconsistent_statistics() {
        let scaler = FeatureScaler::new(ScalingMethod::Robust, vec![0.0; 5], vec![1.0; 4]);
        assert!(scaler.check().is_err());

        let scaler = FeatureScaler::new(ScalingMethod::Robust, vec![f64::NAN; 5], vec![1.0; 5]);
        assert!(scaler.check().is_err());
    }

    #[test]
    fn test_pass_through() {
        let vector = FeatureVector::from_values([1.0, 2.0, 3.0, 4.0, 5.0]);
        let scaling = Scaling::PassThrough;
        assert!(scaling.is_pass_through());
        assert!(scaling.scaler().is_none());
        assert_eq!(scaling.apply(&vector).unwrap(), vector);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xgb.scaler.json");
        std::fs::write(&path, serde_json::to_vec(&robust()).unwrap()).unwrap();

        let loaded = FeatureScaler::load(&path).unwrap();
        assert_eq!(loaded, robust());

        std::fs::write(&path, b"{not json").unwrap();
        assert!(matches!(FeatureScaler::load(&path), Err(ScalerLoadError::Json { .. })));
    }
}
