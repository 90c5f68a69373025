//! Model Registry
//!
//! Every `*.model.json` in the models directory is loaded eagerly at boot.
//! A generation is immutable once built; reload builds a fresh generation and
//! swaps the pointer, so in-flight requests finish on the snapshot they took.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};

use super::artifact::{MetricsSnapshot, ModelArtifact};
use super::classifier::{Classifier, ClassifierFamily};
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::layout::LayoutMismatchError;
use crate::logic::features::{FeatureVector, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::scaling::{FeatureScaler, ScalerLoadError, Scaling};

pub const ARTIFACT_SUFFIX: &str = ".model.json";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("failed to parse {path}: {source}")]
    Json { path: String, source: serde_json::Error },

    #[error("model '{id}' was trained on an incompatible layout: {source}")]
    Layout { id: String, source: LayoutMismatchError },

    #[error("model '{id}' has a malformed classifier: {reason}")]
    Classifier { id: String, reason: String },

    #[error(transparent)]
    Scaler(#[from] ScalerLoadError),

    #[error("scaler for model '{id}' was fitted on {actual} features, expected {expected}")]
    ScalerDimension { id: String, expected: usize, actual: usize },

    #[error("scaler for model '{id}' was fitted on columns [{}], expected the feature layout order", found.join(", "))]
    ScalerLayout { id: String, found: Vec<String> },

    #[error("model id '{0}' is registered twice")]
    Duplicate(String),

    #[error("no model artifacts found in {0}")]
    Empty(String),

    #[error("registry was not loaded from a directory and cannot be reloaded")]
    NoSource,
}

// ============================================================================
// MODEL HANDLE
// ============================================================================

/// A loaded model: classifier, its scaling step and metadata. Immutable.
#[derive(Debug)]
pub struct ModelHandle {
    pub id: String,
    pub name: String,
    pub trained_on: String,
    pub metrics: MetricsSnapshot,
    pub layout: LayoutInfo,
    /// SHA-256 of the artifact file (empty for in-memory models)
    pub checksum: String,
    pub source: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
    classifier: Box<dyn Classifier>,
    scaling: Scaling,
}

impl ModelHandle {
    /// Load an artifact file plus the scaler it references
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| RegistryError::Io {
            path: display.clone(),
            source,
        })?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)
            .map_err(|source| RegistryError::Json { path: display, source })?;

        let scaling = match &artifact.scaler {
            Some(file) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                Scaling::Fitted(FeatureScaler::load(&dir.join(file))?)
            }
            None => Scaling::PassThrough,
        };

        let mut handle = Self::from_artifact(artifact, scaling)?;
        handle.checksum = format!("{:x}", Sha256::digest(&bytes));
        handle.source = Some(path.to_path_buf());
        Ok(handle)
    }

    /// Validate an artifact against the compiled-in layout and build it
    pub fn from_artifact(artifact: ModelArtifact, scaling: Scaling) -> Result<Self, RegistryError> {
        let ModelArtifact { id, name, trained_on, feature_layout, metrics, classifier, .. } = artifact;

        feature_layout
            .validate()
            .map_err(|source| RegistryError::Layout { id: id.clone(), source })?;

        if let Some(scaler) = scaling.scaler() {
            if scaler.dimension() != FEATURE_COUNT {
                return Err(RegistryError::ScalerDimension {
                    id,
                    expected: FEATURE_COUNT,
                    actual: scaler.dimension(),
                });
            }
            if let Some(names) = &scaler.feature_names {
                if names.iter().map(String::as_str).ne(FEATURE_LAYOUT.iter().copied()) {
                    return Err(RegistryError::ScalerLayout { id, found: names.clone() });
                }
            }
        }

        let classifier = classifier
            .build(FEATURE_COUNT)
            .map_err(|reason| RegistryError::Classifier { id: id.clone(), reason })?;

        Ok(Self {
            id,
            name,
            trained_on,
            metrics,
            layout: feature_layout,
            checksum: String::new(),
            source: None,
            loaded_at: Utc::now(),
            classifier,
            scaling,
        })
    }

    pub fn family(&self) -> ClassifierFamily {
        self.classifier.family()
    }

    /// Whether the model expects scaled input
    pub fn has_scaler(&self) -> bool {
        !self.scaling.is_pass_through()
    }

    pub fn scaling(&self) -> &Scaling {
        &self.scaling
    }

    pub fn scale(&self, vector: &FeatureVector) -> PipelineResult<FeatureVector> {
        self.scaling.apply(vector)
    }

    /// Scale then classify. The caller's vector is left untouched.
    pub fn score(&self, vector: &FeatureVector) -> PipelineResult<f64> {
        let scaled = self.scale(vector)?;
        let probability = self.classifier.predict_proba(scaled.as_slice());
        if !probability.is_finite() {
            return Err(PipelineError::invalid(
                "probability",
                format!("model '{}' produced a non-finite score", self.id),
            ));
        }
        Ok(probability.clamp(0.0, 1.0))
    }

    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        self.classifier.feature_importances()
    }
}

// ============================================================================
// REGISTRY GENERATION
// ============================================================================

#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<ModelHandle>>,
    generation: u64,
}

impl ModelRegistry {
    pub fn new(generation: u64) -> Self {
        Self { models: BTreeMap::new(), generation }
    }

    /// Load every artifact in `dir`, in file-name order
    pub fn load_dir(dir: &Path, generation: u64) -> Result<Self, RegistryError> {
        let display = dir.display().to_string();
        let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::Io {
            path: display.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Io {
                path: display.clone(),
                source,
            })?;
            let path = entry.path();
            let is_artifact = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(ARTIFACT_SUFFIX));
            if is_artifact && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new(generation);
        for path in &paths {
            let handle = registry.register(path)?;
            tracing::info!(
                model = %handle.id,
                family = handle.family().as_str(),
                scaler = handle.has_scaler(),
                checksum = %handle.checksum,
                "Loaded model from {}",
                path.display()
            );
        }

        if registry.is_empty() {
            return Err(RegistryError::Empty(display));
        }
        Ok(registry)
    }

    pub fn register(&mut self, path: &Path) -> Result<Arc<ModelHandle>, RegistryError> {
        self.insert(ModelHandle::load(path)?)
    }

    pub fn insert(&mut self, handle: ModelHandle) -> Result<Arc<ModelHandle>, RegistryError> {
        if self.models.contains_key(&handle.id) {
            return Err(RegistryError::Duplicate(handle.id));
        }
        let handle = Arc::new(handle);
        self.models.insert(handle.id.clone(), handle.clone());
        Ok(handle)
    }

    /// Never falls back to another model
    pub fn lookup(&self, id: &str) -> PipelineResult<Arc<ModelHandle>> {
        self.models.get(id).cloned().ok_or_else(|| PipelineError::UnknownModel {
            requested: id.to_string(),
            available: self.ids(),
        })
    }

    pub fn list(&self) -> impl Iterator<Item = &Arc<ModelHandle>> {
        self.models.values()
    }

    pub fn ids(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================================================
// SHARED REGISTRY
// ============================================================================

/// Process-wide handle to the current registry generation
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<ModelRegistry>>,
    dir: Option<PathBuf>,
    reload_lock: Mutex<()>,
}

impl SharedRegistry {
    /// Build generation 1 from a models directory
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let dir = dir.into();
        let registry = ModelRegistry::load_dir(&dir, 1)?;
        Ok(Self {
            current: RwLock::new(Arc::new(registry)),
            dir: Some(dir),
            reload_lock: Mutex::new(()),
        })
    }

    pub fn from_registry(registry: ModelRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
            dir: None,
            reload_lock: Mutex::new(()),
        }
    }

    /// Consistent view of one generation for the duration of a request
    pub fn snapshot(&self) -> Arc<ModelRegistry> {
        self.current.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    /// Rebuild from disk and swap. On failure the current generation stays.
    pub fn reload(&self) -> Result<Arc<ModelRegistry>, RegistryError> {
        let dir = self.dir.as_ref().ok_or(RegistryError::NoSource)?;
        let _guard = self.reload_lock.lock();

        let next = self.generation() + 1;
        let registry = Arc::new(ModelRegistry::load_dir(dir, next)?);
        *self.current.write() = registry.clone();

        tracing::info!(generation = next, models = registry.len(), "Model registry reloaded");
        Ok(registry)
    }
}
