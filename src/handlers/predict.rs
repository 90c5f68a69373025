//! Batch prediction handler (CSV upload)

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};

use super::extract::ApiMultipart;
use crate::logic::error::PipelineError;
use crate::logic::mission::{MissionTag, Table};
use crate::logic::pipeline::{run_batch, BatchOptions};
use crate::logic::verdict::Threshold;
use crate::models::PredictResponse;
use crate::{AppError, AppResult, AppState};

/// Fields of the multipart form
#[derive(Debug, Default)]
struct PredictForm {
    file: Option<(String, Bytes)>,
    model: Option<String>,
    threshold: Option<String>,
    mission: Option<String>,
}

impl PredictForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or("upload").to_string();
                    form.file = Some((filename, field.bytes().await?));
                }
                "model" => form.model = non_empty(field.text().await?),
                "threshold" => form.threshold = non_empty(field.text().await?),
                // `telescope` is the legacy name of the field
                "mission" | "telescope" => form.mission = non_empty(field.text().await?),
                other => tracing::debug!("Ignoring form field '{}'", other),
            }
        }
        Ok(form)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn parse_threshold(raw: Option<&str>, default: Threshold) -> AppResult<Threshold> {
    match raw {
        None => Ok(default),
        Some(text) => {
            let value: f64 = text
                .parse()
                .map_err(|_| AppError::BadRequest(format!("threshold '{}' is not a number", text)))?;
            Ok(Threshold::new(value)?)
        }
    }
}

fn parse_mission(raw: Option<&str>) -> AppResult<Option<MissionTag>> {
    match raw {
        None => Ok(None),
        Some(text) if text.eq_ignore_ascii_case("auto") => Ok(None),
        Some(text) => text
            .parse::<MissionTag>()
            .map(Some)
            .map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

/// Classify every row of an uploaded catalog
pub async fn predict(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<PredictResponse>> {
    let started = Instant::now();
    let form = PredictForm::read(multipart).await?;

    let (filename, bytes) = form
        .file
        .ok_or_else(|| AppError::BadRequest("missing 'file' field".to_string()))?;

    if !filename.to_ascii_lowercase().ends_with(".csv") {
        return Err(PipelineError::UnsupportedFileType(filename).into());
    }
    if bytes.len() > state.config.max_upload_bytes() {
        return Err(AppError::PayloadTooLarge(format!(
            "file is {} bytes, limit is {} MB",
            bytes.len(),
            state.config.max_file_size_mb
        )));
    }

    let default_threshold = state.config.threshold()?;
    let threshold = parse_threshold(form.threshold.as_deref(), default_threshold)?;
    let mission = parse_mission(form.mission.as_deref())?;
    let model_id = form.model.unwrap_or_else(|| state.config.default_model.clone());

    let options = BatchOptions {
        mission,
        deadline: state.config.batch_deadline.map(|d| started + d),
        ..BatchOptions::default()
    };

    let registry = state.registry.snapshot();
    let outcome = tokio::task::spawn_blocking(move || {
        let table = Table::from_csv(&bytes[..])?.with_source_name(filename);
        run_batch(&registry, &table, &model_id, threshold, &options)
    })
    .await??;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        model = %outcome.model_id,
        mission = %outcome.mission,
        scored = outcome.verdicts.len(),
        excluded = outcome.exclusions.len(),
        planets = outcome.summary.predicted_planets,
        truncated = outcome.truncated,
        "Batch prediction completed in {:.1} ms",
        elapsed_ms
    );

    Ok(Json(PredictResponse::new(outcome, elapsed_ms)))
}
