//! Manual entry handlers

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use super::extract::ApiJson;
use crate::logic::pipeline::run_single;
use crate::logic::reference::{example_planets, ExamplePlanet, ParameterRange, PARAMETER_RANGES};
use crate::logic::verdict::Threshold;
use crate::models::{ManualPredictRequest, ManualPredictResponse};
use crate::{AppResult, AppState};

/// Classify one parameter set given in canonical units
pub async fn predict(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ManualPredictRequest>,
) -> AppResult<Json<ManualPredictResponse>> {
    let threshold = match req.threshold {
        Some(t) => Threshold::new(t)?,
        None => state.config.threshold()?,
    };
    let model_id = req.model.unwrap_or_else(|| state.config.default_model.clone());

    let verdict = run_single(&state.registry.snapshot(), &req.parameters, &model_id, threshold)?;

    Ok(Json(ManualPredictResponse::new(verdict, model_id, threshold.value())))
}

pub async fn parameter_ranges() -> Json<BTreeMap<&'static str, &'static ParameterRange>> {
    Json(PARAMETER_RANGES.iter().map(|r| (r.field, r)).collect())
}

#[derive(Serialize)]
pub struct ExamplePlanetsResponse {
    examples: Vec<ExamplePlanet>,
}

pub async fn example_planets_list() -> Json<ExamplePlanetsResponse> {
    Json(ExamplePlanetsResponse { examples: example_planets() })
}
