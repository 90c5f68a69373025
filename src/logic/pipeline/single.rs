//! Single-Sample Orchestrator

use serde::{Deserialize, Serialize};

use super::{score_record, Verdict};
use crate::logic::error::PipelineResult;
use crate::logic::features::CanonicalFeatureRecord;
use crate::logic::model::ModelRegistry;
use crate::logic::verdict::Threshold;

pub const MANUAL_SAMPLE_ID: &str = "manual";

/// Manually entered parameters, already in canonical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualParameters {
    /// days
    pub orbital_period: f64,
    /// Earth radii
    pub planet_radius: f64,
    /// hours
    pub transit_duration: f64,
    /// ppm
    #[serde(default)]
    pub transit_depth: Option<f64>,
    /// Kelvin
    #[serde(default)]
    pub stellar_temp: Option<f64>,
}

impl ManualParameters {
    pub fn to_record(&self) -> PipelineResult<CanonicalFeatureRecord> {
        CanonicalFeatureRecord::new(
            self.orbital_period,
            self.planet_radius,
            self.transit_duration,
            self.transit_depth,
            self.stellar_temp,
        )
    }
}

pub fn run_single(
    registry: &ModelRegistry,
    parameters: &ManualParameters,
    model_id: &str,
    threshold: Threshold,
) -> PipelineResult<Verdict> {
    let handle = registry.lookup(model_id)?;
    let record = parameters.to_record()?;
    let verdict = score_record(&handle, &record, MANUAL_SAMPLE_ID.to_string(), threshold)?;

    tracing::debug!(
        model = model_id,
        probability = verdict.probability,
        label = verdict.label.as_str(),
        "Manual prediction"
    );
    Ok(verdict)
}
