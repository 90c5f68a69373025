//! Pipeline Error Taxonomy
//!
//! Row-level kinds (missing feature, invalid value) are collected by the batch
//! orchestrator. Everything else is request-fatal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Required canonical field absent after adaptation
    #[error("missing required feature '{field}'")]
    MissingFeature { field: &'static str },

    /// Out-of-domain numeric
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Vector and fitted scaler disagree on dimensionality
    #[error("scaler fitted on {expected} features but vector has {actual}")]
    ScalerMismatch { expected: usize, actual: usize },

    #[error("model '{requested}' not found. Available: [{}]", available.join(", "))]
    UnknownModel { requested: String, available: Vec<String> },

    #[error("threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("empty input: {0}")]
    EmptyInput(String),

    #[error("no valid samples: {0}")]
    NoValidSamples(String),

    #[error("unsupported file type '{0}', expected a .csv file")]
    UnsupportedFileType(String),
}

/// Machine-readable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MissingFeature,
    InvalidValue,
    ScalerMismatch,
    UnknownModel,
    InvalidThreshold,
    EmptyInput,
    NoValidSamples,
    UnsupportedFileType,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingFeature => "MISSING_FEATURE",
            ErrorKind::InvalidValue => "INVALID_VALUE",
            ErrorKind::ScalerMismatch => "SCALER_MISMATCH",
            ErrorKind::UnknownModel => "UNKNOWN_MODEL",
            ErrorKind::InvalidThreshold => "INVALID_THRESHOLD",
            ErrorKind::EmptyInput => "EMPTY_INPUT",
            ErrorKind::NoValidSamples => "NO_VALID_SAMPLES",
            ErrorKind::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MissingFeature { .. } => ErrorKind::MissingFeature,
            PipelineError::InvalidValue { .. } => ErrorKind::InvalidValue,
            PipelineError::ScalerMismatch { .. } => ErrorKind::ScalerMismatch,
            PipelineError::UnknownModel { .. } => ErrorKind::UnknownModel,
            PipelineError::InvalidThreshold(_) => ErrorKind::InvalidThreshold,
            PipelineError::EmptyInput(_) => ErrorKind::EmptyInput,
            PipelineError::NoValidSamples(_) => ErrorKind::NoValidSamples,
            PipelineError::UnsupportedFileType(_) => ErrorKind::UnsupportedFileType,
        }
    }

    /// Errors the batch orchestrator may exclude a single row for
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingFeature { .. } | PipelineError::InvalidValue { .. }
        )
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::InvalidValue { field, reason: reason.into() }
    }
}
