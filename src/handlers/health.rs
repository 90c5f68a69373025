//! Health check and service banner

use axum::{extract::State, http::Uri, Json};
use serde::Serialize;

use crate::{AppError, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    models_loaded: usize,
    generation: u64,
    default_model: String,
    version: &'static str,
    uptime_seconds: u64,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.registry.snapshot();
    Json(HealthResponse {
        status: "healthy",
        models_loaded: snapshot.len(),
        generation: snapshot.generation(),
        default_model: state.config.default_model.clone(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[derive(Serialize)]
pub struct Banner {
    service: &'static str,
    version: &'static str,
    missions: [&'static str; 3],
    endpoints: &'static [&'static str],
}

pub async fn root() -> Json<Banner> {
    Json(Banner {
        service: "Exohunt transit candidate classifier",
        version: env!("CARGO_PKG_VERSION"),
        missions: ["Kepler", "K2", "TESS"],
        endpoints: &[
            "POST /predict",
            "POST /manual-predict",
            "GET /models",
            "GET /models/{id}/metrics",
            "GET /models/{id}/importance",
            "GET /models/{id}/statistics",
            "POST /models/reload",
            "GET /parameter-ranges",
            "GET /example-planets",
            "GET /health",
        ],
    })
}

/// Fallback for unmatched paths
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
