//! Shared fixtures for pipeline and HTTP tests

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use super::registry::{ModelHandle, ModelRegistry, SharedRegistry};
use super::ModelArtifact;
use crate::logic::features::LayoutInfo;
use crate::logic::scaling::{FeatureScaler, Scaling, ScalingMethod};

pub(crate) fn metrics() -> Value {
    json!({
        "accuracy": 0.838,
        "precision": 0.818,
        "recall": 0.871,
        "f1_score": 0.843,
        "roc_auc": 0.894,
        "cross_validation": { "n_folds": 5, "mean_recall": 0.8567, "std_recall": 0.0187 },
        "training_date": "2025-10-04T17:32:57Z",
        "training_samples": 9201
    })
}

fn layout() -> Value {
    serde_json::to_value(LayoutInfo::current()).unwrap()
}

/// p = sigmoid(orbital_period - 5) on raw features
pub(crate) fn linear_period_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Linear period probe",
        "trained_on": "synthetic",
        "feature_layout": layout(),
        "metrics": metrics(),
        "classifier": {
            "family": "neural_network",
            "layers": [
                { "weights": [[1.0, 0.0, 0.0, 0.0, 0.0]], "bias": [-5.0], "activation": "identity" }
            ]
        }
    })
}

/// Two stumps over scaled radius and scaled stellar temperature
pub(crate) fn trees_json(id: &str, scaler: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": "Gradient boosted trees",
        "trained_on": "Kepler KOI cumulative table",
        "feature_layout": layout(),
        "scaler": scaler,
        "metrics": metrics(),
        "classifier": {
            "family": "gradient_boosted_trees",
            "base_margin": 0.2,
            "trees": [
                { "nodes": [
                    { "feature": 1, "threshold": 1.0, "left": 1, "right": 2, "default_left": true, "gain": 120.0 },
                    { "leaf": 1.4 },
                    { "leaf": -1.8 }
                ] },
                { "nodes": [
                    { "feature": 4, "threshold": 0.5, "left": 1, "right": 2, "gain": 40.0 },
                    { "leaf": 0.3 },
                    { "leaf": -0.6 }
                ] }
            ]
        }
    })
}

pub(crate) fn scaler() -> FeatureScaler {
    FeatureScaler::new(
        ScalingMethod::Robust,
        vec![10.0, 2.2, 3.5, 500.0, 5600.0],
        vec![30.0, 3.0, 3.0, 1500.0, 1000.0],
    )
}

fn handle(artifact: Value, scaling: Scaling) -> ModelHandle {
    let artifact: ModelArtifact = serde_json::from_value(artifact).unwrap();
    ModelHandle::from_artifact(artifact, scaling).unwrap()
}

/// In-memory registry: `xgb` (scaled trees) and `probe` (raw linear)
pub(crate) fn registry() -> Arc<SharedRegistry> {
    let mut registry = ModelRegistry::new(1);
    registry.insert(handle(trees_json("xgb", None), Scaling::Fitted(scaler()))).unwrap();
    registry.insert(handle(linear_period_json("probe"), Scaling::PassThrough)).unwrap();
    Arc::new(SharedRegistry::from_registry(registry))
}

/// Write `xgb` with its scaler file into `dir`
pub(crate) fn write_models_dir(dir: &Path) {
    std::fs::write(
        dir.join("xgb.model.json"),
        serde_json::to_vec_pretty(&trees_json("xgb", Some("xgb.scaler.json"))).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("xgb.scaler.json"),
        serde_json::to_vec_pretty(&scaler()).unwrap(),
    )
    .unwrap();
}
