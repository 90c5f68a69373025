//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::logic::error::PipelineResult;
use crate::logic::verdict::{Threshold, DEFAULT_THRESHOLD};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding `*.model.json` artifacts and their scalers
    pub models_dir: PathBuf,

    /// Model used when a request does not name one
    pub default_model: String,

    /// Threshold used when a request does not give one
    pub default_threshold: f64,

    /// Upload size limit in megabytes
    pub max_file_size_mb: usize,

    /// Soft deadline for a batch; unset means no deadline
    pub batch_deadline: Option<Duration>,

    /// Environment (development, production)
    pub environment: String,

    /// `json` or `pretty`
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models")),

            default_model: env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| "xgb".to_string()),

            default_threshold: env::var("DEFAULT_THRESHOLD")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_THRESHOLD),

            max_file_size_mb: env::var("MAX_FILE_SIZE_MB")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(50),

            batch_deadline: env::var("BATCH_DEADLINE_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Configured default, validated like a request threshold
    pub fn threshold(&self) -> PipelineResult<Threshold> {
        Threshold::new(self.default_threshold)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            models_dir: PathBuf::from("./models"),
            default_model: "xgb".to_string(),
            default_threshold: DEFAULT_THRESHOLD,
            max_file_size_mb: 50,
            batch_deadline: None,
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
