//! Feature Vector - Core data structure for classifier input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks

use serde::{Deserialize, Serialize};

use super::layout::{
    layout_hash, validate_layout, Domain, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION, FIELD_SPECS, IDX_ORBITAL_PERIOD, IDX_PLANET_RADIUS, IDX_STELLAR_TEMP,
    IDX_TRANSIT_DEPTH, IDX_TRANSIT_DURATION,
};
use super::record::CanonicalFeatureRecord;
use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
///
/// Scalers and classifiers only ever receive this type, never a bare slice
/// assembled at a call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_LAYOUT
    }

    /// Named view for echoing back to callers
    pub fn named(&self) -> FeatureValues {
        FeatureValues {
            orbital_period: self.values[IDX_ORBITAL_PERIOD],
            planet_radius: self.values[IDX_PLANET_RADIUS],
            transit_duration: self.values[IDX_TRANSIT_DURATION],
            transit_depth: self.values[IDX_TRANSIT_DEPTH],
            stellar_temp: self.values[IDX_STELLAR_TEMP],
        }
    }
}

/// Extracted (unscaled) features keyed by layout name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureValues {
    pub orbital_period: f64,
    pub planet_radius: f64,
    pub transit_duration: f64,
    pub transit_depth: f64,
    pub stellar_temp: f64,
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Output of feature extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub vector: FeatureVector,
    /// Optional fields that were filled from their documented default
    pub imputed: Vec<&'static str>,
}

/// Turn a canonical record into the model input vector.
///
/// Optional fields fall back to the per-field default from `FIELD_SPECS`;
/// every value is then checked against its domain.
pub fn extract(record: &CanonicalFeatureRecord) -> PipelineResult<Extraction> {
    let present: [Option<f64>; FEATURE_COUNT] = [
        Some(record.orbital_period_days()),
        Some(record.planet_radius_earth_radii()),
        Some(record.transit_duration_hours()),
        record.transit_depth_ppm(),
        record.stellar_temp_kelvin(),
    ];

    let mut values = [0.0f64; FEATURE_COUNT];
    let mut imputed = Vec::new();

    for (i, spec) in FIELD_SPECS.iter().enumerate() {
        let value = match (present[i], spec.default) {
            (Some(v), _) => v,
            (None, Some(default)) => {
                imputed.push(spec.name);
                default
            }
            (None, None) => return Err(PipelineError::MissingFeature { field: spec.name }),
        };

        if !value.is_finite() {
            return Err(PipelineError::invalid(spec.name, "value is not finite"));
        }
        match spec.domain {
            Domain::Positive if value <= 0.0 => {
                return Err(PipelineError::invalid(
                    spec.name,
                    format!("must be greater than zero, got {} {}", value, spec.unit),
                ));
            }
            Domain::NonNegative if value < 0.0 => {
                return Err(PipelineError::invalid(
                    spec.name,
                    format!("must not be negative, got {}", value),
                ));
            }
            _ => {}
        }

        values[i] = value;
    }

    Ok(Extraction {
        vector: FeatureVector::from_values(values),
        imputed,
    })
}

// ============================================================================
// TESTS
// ============================================================================
