//! Model introspection handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::models::{
    ImportanceResponse, MetricsResponse, ModelListResponse, ModelSummary, StatisticsResponse,
};
use crate::{AppError, AppResult, AppState};

/// List every model of the current generation
pub async fn list(State(state): State<AppState>) -> Json<ModelListResponse> {
    let snapshot = state.registry.snapshot();
    let models: Vec<ModelSummary> = snapshot.list().map(|h| ModelSummary::from(h.as_ref())).collect();
    Json(ModelListResponse {
        total: models.len(),
        models,
        generation: snapshot.generation(),
    })
}

pub async fn metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MetricsResponse>> {
    let handle = state.registry.snapshot().lookup(&id)?;
    Ok(Json(MetricsResponse::from(handle.as_ref())))
}

pub async fn importance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ImportanceResponse>> {
    let handle = state.registry.snapshot().lookup(&id)?;
    let importances = handle.feature_importances().ok_or_else(|| {
        AppError::Unsupported(format!(
            "model '{}' ({}) does not expose feature importances",
            id,
            handle.family().as_str()
        ))
    })?;
    Ok(Json(ImportanceResponse::ranked(handle.id.clone(), &importances)))
}

pub async fn statistics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatisticsResponse>> {
    let handle = state.registry.snapshot().lookup(&id)?;
    Ok(Json(StatisticsResponse::from(handle.as_ref())))
}

/// Rebuild the registry from disk and swap generations
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ModelListResponse>> {
    let registry = state.registry.clone();
    let snapshot = tokio::task::spawn_blocking(move || registry.reload()).await??;

    let models: Vec<ModelSummary> = snapshot.list().map(|h| ModelSummary::from(h.as_ref())).collect();
    Ok(Json(ModelListResponse {
        total: models.len(),
        models,
        generation: snapshot.generation(),
    }))
}
