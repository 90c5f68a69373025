//! Model Module - Registry and Classifier Adapter
//!
//! Artifacts on disk → validated `ModelHandle`s behind a swappable registry.
//! Callers score through `ModelHandle::score` and never see the family.

pub mod artifact;
pub mod classifier;
pub mod ensemble;
pub mod neural;
pub mod registry;
pub mod trees;

#[cfg(test)]
pub(crate) mod testing;

pub use artifact::{CrossValidation, MetricsSnapshot, ModelArtifact};
pub use classifier::{Classifier, ClassifierFamily, ClassifierSpec};
pub use registry::{ModelHandle, ModelRegistry, RegistryError, SharedRegistry};
