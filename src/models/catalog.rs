//! Model introspection payloads

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::features::layout::{DEFAULT_STELLAR_TEMP_K, DEFAULT_TRANSIT_DEPTH_PPM};
use crate::logic::features::{LayoutInfo, FEATURE_LAYOUT};
use crate::logic::model::{CrossValidation, ModelHandle};
use crate::logic::scaling::ScalingMethod;

#[derive(Debug, Serialize)]
pub struct PerformanceBrief {
    pub recall: f64,
    pub roc_auc: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub family: &'static str,
    pub status: &'static str,
    pub has_scaler: bool,
    pub trained_on: String,
    pub performance: PerformanceBrief,
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
}

impl From<&ModelHandle> for ModelSummary {
    fn from(h: &ModelHandle) -> Self {
        Self {
            id: h.id.clone(),
            name: h.name.clone(),
            family: h.family().as_str(),
            status: "ready",
            has_scaler: h.has_scaler(),
            trained_on: h.trained_on.clone(),
            performance: PerformanceBrief {
                recall: h.metrics.recall,
                roc_auc: h.metrics.roc_auc,
            },
            checksum: h.checksum.clone(),
            loaded_at: h.loaded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelSummary>,
    pub total: usize,
    pub generation: u64,
}

#[derive(Debug, Serialize)]
pub struct Performance {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub model: String,
    pub performance: Performance,
    pub cross_validation: Option<CrossValidation>,
    pub training_date: Option<String>,
    pub training_samples: Option<u64>,
}

impl From<&ModelHandle> for MetricsResponse {
    fn from(h: &ModelHandle) -> Self {
        let m = &h.metrics;
        Self {
            model: h.id.clone(),
            performance: Performance {
                accuracy: m.accuracy,
                precision: m.precision,
                recall: m.recall,
                f1_score: m.f1_score,
                roc_auc: m.roc_auc,
            },
            cross_validation: m.cross_validation.clone(),
            training_date: m.training_date.clone(),
            training_samples: m.training_samples,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
    pub rank: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportanceResponse {
    pub model: String,
    pub features: Vec<FeatureImportance>,
}

impl ImportanceResponse {
    /// Rank by importance, highest first; ties keep layout order
    pub fn ranked(model: String, importances: &[f64]) -> Self {
        let mut features: Vec<FeatureImportance> = FEATURE_LAYOUT
            .iter()
            .zip(importances)
            .map(|(feature, importance)| FeatureImportance {
                feature: *feature,
                importance: *importance,
                rank: 0,
            })
            .collect();
        features.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        for (i, f) in features.iter_mut().enumerate() {
            f.rank = i + 1;
        }
        Self { model, features }
    }
}

#[derive(Debug, Serialize)]
pub struct ScalerStatistics {
    pub method: ScalingMethod,
    pub features: Vec<FeatureStatistic>,
}

#[derive(Debug, Serialize)]
pub struct FeatureStatistic {
    pub feature: String,
    pub center: f64,
    pub scale: f64,
}

#[derive(Debug, Serialize)]
pub struct ImputationDefaults {
    pub transit_depth: f64,
    pub stellar_temp: f64,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub model: String,
    pub feature_layout: LayoutInfo,
    pub scaler: Option<ScalerStatistics>,
    pub imputation_defaults: ImputationDefaults,
}

impl From<&ModelHandle> for StatisticsResponse {
    fn from(h: &ModelHandle) -> Self {
        let scaler = h.scaling().scaler().map(|s| ScalerStatistics {
            method: s.method,
            features: h
                .layout
                .feature_names
                .iter()
                .zip(s.center.iter().zip(&s.scale))
                .map(|(name, (center, scale))| FeatureStatistic {
                    feature: name.clone(),
                    center: *center,
                    scale: *scale,
                })
                .collect(),
        });

        let mut feature_layout = h.layout.clone();
        feature_layout.hash = Some(feature_layout.computed_hash());

        Self {
            model: h.id.clone(),
            feature_layout,
            scaler,
            imputation_defaults: ImputationDefaults {
                transit_depth: DEFAULT_TRANSIT_DEPTH_PPM,
                stellar_temp: DEFAULT_STELLAR_TEMP_K,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_ranking() {
        let response = ImportanceResponse::ranked("xgb".into(), &[0.1, 0.5, 0.0, 0.3, 0.1]);
        let order: Vec<_> = response.features.iter().map(|f| f.feature).collect();
        assert_eq!(
            order,
            vec!["planet_radius", "transit_depth", "orbital_period", "stellar_temp", "transit_duration"]
        );
        assert_eq!(response.features[0].rank, 1);
        assert_eq!(response.features[4].rank, 5);
    }
}
