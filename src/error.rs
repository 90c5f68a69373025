//! Error handling

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logic::error::{ErrorKind, PipelineError};
use crate::logic::model::RegistryError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Pipeline errors (machine-readable kind)
    Pipeline(PipelineError),

    // Request errors
    BadRequest(String),
    PayloadTooLarge(String),

    // Capability errors
    Unsupported(String),

    // Resource errors
    NotFound(String),

    // Registry reload errors
    RegistryError(String),

    // Generic errors
    InternalError(String),
}

fn pipeline_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnknownModel => StatusCode::NOT_FOUND,
        ErrorKind::UnsupportedFileType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::NoValidSamples => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ScalerMismatch => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::MissingFeature
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidThreshold
        | ErrorKind::EmptyInput => StatusCode::BAD_REQUEST,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Pipeline(err) => pipeline_status(err.kind()),
            AppError::BadRequest(_) | AppError::Unsupported(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RegistryError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, detail) = match &self {
            AppError::Pipeline(err) => {
                tracing::warn!(kind = %err.kind(), "Request rejected: {}", err);
                (err.kind().as_str(), err.to_string())
            }
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => ("PAYLOAD_TOO_LARGE", msg.clone()),
            AppError::Unsupported(msg) => ("UNSUPPORTED", msg.clone()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::RegistryError(msg) => {
                tracing::error!("Registry error: {}", msg);
                ("REGISTRY_ERROR", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": kind,
            "detail": detail,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::RegistryError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("worker task failed: {}", err))
    }
}
