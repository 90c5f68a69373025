//! Features Module - Feature Extraction
//!
//! Canonical record → fixed-order, versioned feature vector.
//! Both inference paths go through `extract`, nothing else builds vectors.

pub mod layout;
pub mod record;
pub mod vector;

// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use record::{CanonicalFeatureRecord, Disposition};
pub use vector::{extract, Extraction, FeatureValues, FeatureVector};
