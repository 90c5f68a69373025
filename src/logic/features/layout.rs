//! Feature Layout - Canonical Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! Every inference path (batch upload and manual entry) builds its vector from
//! this table, and every model artifact declares the layout it was trained on.
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Trained scalers and classifiers index columns positionally, so a reordered
//! layout scores against the wrong columns without raising any error.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "orbital_period",   // 0: days
    "planet_radius",    // 1: Earth radii
    "transit_duration", // 2: hours
    "transit_depth",    // 3: ppm (optional, imputed)
    "stellar_temp",     // 4: Kelvin (optional, imputed)
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 5;

pub const IDX_ORBITAL_PERIOD: usize = 0;
pub const IDX_PLANET_RADIUS: usize = 1;
pub const IDX_TRANSIT_DURATION: usize = 2;
pub const IDX_TRANSIT_DEPTH: usize = 3;
pub const IDX_STELLAR_TEMP: usize = 4;

// ============================================================================
// FIELD DOMAINS
// ============================================================================

/// Substituted when a catalog row or manual entry has no transit depth.
/// Roughly the median depth of confirmed transiting planets.
pub const DEFAULT_TRANSIT_DEPTH_PPM: f64 = 1000.0;

/// Substituted when no host star temperature is given (solar effective temperature).
pub const DEFAULT_STELLAR_TEMP_K: f64 = 5778.0;

/// Lower bound a feature value must respect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// value > 0
    Positive,
    /// value >= 0
    NonNegative,
}

/// Static description of one canonical feature
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub domain: Domain,
    /// `None` for required fields
    pub default: Option<f64>,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Per-feature specs, same order as FEATURE_LAYOUT
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec { name: "orbital_period", unit: "days", domain: Domain::Positive, default: None },
    FieldSpec { name: "planet_radius", unit: "Earth radii", domain: Domain::Positive, default: None },
    FieldSpec { name: "transit_duration", unit: "hours", domain: Domain::Positive, default: None },
    FieldSpec {
        name: "transit_depth",
        unit: "ppm",
        domain: Domain::NonNegative,
        default: Some(DEFAULT_TRANSIT_DEPTH_PPM),
    },
    FieldSpec {
        name: "stellar_temp",
        unit: "K",
        domain: Domain::Positive,
        default: Some(DEFAULT_STELLAR_TEMP_K),
    },
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    hash_layout(FEATURE_VERSION, FEATURE_LAYOUT.iter().copied())
}

/// Hash an arbitrary (version, names) pair the same way as the current layout
pub fn hash_layout<'a>(version: u8, names: impl IntoIterator<Item = &'a str>) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout description, as declared by model artifacts and served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    #[serde(default)]
    pub hash: Option<u32>,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: Some(layout_hash()),
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Hash recomputed from the declared names (a stored hash is only checked against it)
    pub fn computed_hash(&self) -> u32 {
        hash_layout(self.version, self.feature_names.iter().map(String::as_str))
    }

    /// Validate a declared layout against the compiled-in one
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        let actual_hash = self.computed_hash();
        let stored_ok = self.hash.map_or(true, |h| h == actual_hash);
        validate_layout(self.version, actual_hash).and_then(|_| {
            if stored_ok {
                Ok(())
            } else {
                Err(LayoutMismatchError {
                    expected_version: FEATURE_VERSION,
                    expected_hash: layout_hash(),
                    actual_version: self.version,
                    actual_hash: self.hash.unwrap_or(actual_hash),
                })
            }
        })
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version,
            self.expected_hash,
            self.actual_version,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
