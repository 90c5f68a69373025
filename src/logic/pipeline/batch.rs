//! Batch Orchestrator
//!
//! Rows are scored in ordered chunks; rows inside a chunk run in parallel and
//! `collect` keeps input order. A row that fails adaptation or extraction is
//! excluded and reported, never dropped silently.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use super::summary::BatchSummary;
use super::{score_record, Verdict};
use crate::logic::error::{ErrorKind, PipelineError, PipelineResult};
use crate::logic::mission::{self, MissionTag, RawRow, Table};
use crate::logic::model::{ModelHandle, ModelRegistry};
use crate::logic::verdict::Threshold;

pub const DEFAULT_CHUNK_ROWS: usize = 512;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Caller-chosen mission; skips detection
    pub mission: Option<MissionTag>,
    /// No new chunk is started after this instant
    pub deadline: Option<Instant>,
    pub chunk_rows: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mission: None,
            deadline: None,
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }
}

/// Why a row is missing from the predictions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowExclusion {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: ErrorKind,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub mission: MissionTag,
    pub model_id: String,
    pub threshold: Threshold,
    pub verdicts: Vec<Verdict>,
    pub exclusions: Vec<RowExclusion>,
    pub summary: BatchSummary,
    /// Deadline hit before every row was scored
    pub truncated: bool,
}

enum RowOutcome {
    Scored(Verdict),
    Excluded(RowExclusion),
}

pub fn run_batch(
    registry: &ModelRegistry,
    table: &Table,
    model_id: &str,
    threshold: Threshold,
    options: &BatchOptions,
) -> PipelineResult<BatchOutcome> {
    let handle = registry.lookup(model_id)?;

    if table.is_empty() {
        return Err(PipelineError::EmptyInput(
            "file contains no data rows".to_string(),
        ));
    }

    let mission = mission::resolve(options.mission, &table.headers, table.source_name.as_deref())?;
    tracing::debug!(
        %mission,
        model = model_id,
        rows = table.len(),
        "Running batch classification"
    );

    let mut verdicts = Vec::with_capacity(table.len());
    let mut exclusions = Vec::new();
    let mut truncated = false;

    for (i, chunk) in table.rows.chunks(options.chunk_rows.max(1)).enumerate() {
        if i > 0 && options.deadline.is_some_and(|d| Instant::now() >= d) {
            truncated = true;
            break;
        }

        let outcomes = chunk
            .par_iter()
            .map(|row| score_row(&handle, row, mission, threshold))
            .collect::<PipelineResult<Vec<_>>>()?;

        for outcome in outcomes {
            match outcome {
                RowOutcome::Scored(verdict) => verdicts.push(verdict),
                RowOutcome::Excluded(exclusion) => exclusions.push(exclusion),
            }
        }
    }

    if !exclusions.is_empty() {
        tracing::warn!(
            excluded = exclusions.len(),
            scored = verdicts.len(),
            "Excluded rows from batch"
        );
    }

    if verdicts.is_empty() {
        let first = exclusions
            .first()
            .map(|e| format!("; first failure at row {}: {}", e.row, e.detail))
            .unwrap_or_default();
        return Err(PipelineError::NoValidSamples(format!(
            "none of {} rows could be adapted to the {} schema{}",
            exclusions.len(),
            mission,
            first
        )));
    }

    let summary = BatchSummary::compute(&verdicts, &exclusions, table.blank_rows);
    Ok(BatchOutcome {
        mission,
        model_id: handle.id.clone(),
        threshold,
        verdicts,
        exclusions,
        summary,
        truncated,
    })
}

fn score_row(
    handle: &ModelHandle,
    row: &RawRow,
    mission: MissionTag,
    threshold: Threshold,
) -> PipelineResult<RowOutcome> {
    let id = mission::sample_id(row, mission).or_else(|| row.get("id").map(str::to_string));

    let scored = mission::adapt(row, mission).and_then(|record| {
        let label = id.clone().unwrap_or_else(|| row.index.to_string());
        score_record(handle, &record, label, threshold)
    });

    match scored {
        Ok(verdict) => Ok(RowOutcome::Scored(verdict)),
        Err(err) if err.is_row_level() => {
            tracing::debug!(row = row.index, kind = %err.kind(), "Row excluded: {}", err);
            Ok(RowOutcome::Excluded(RowExclusion {
                row: row.index,
                id,
                kind: err.kind(),
                detail: err.to_string(),
            }))
        }
        Err(err) => Err(err),
    }
}
