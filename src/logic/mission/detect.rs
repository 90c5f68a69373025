//! Mission detection
//!
//! Runs once per table. Column markers take precedence over the file name,
//! and an explicit caller choice takes precedence over both.

use super::MissionTag;
use crate::logic::error::{PipelineError, PipelineResult};

const TESS_MARKERS: &[&str] = &["tfopwg_disp", "toi", "tid", "pl_trandurh"];
const K2_MARKERS: &[&str] = &["pl_orbper", "epic_hostname", "epic_candname", "k2_campaigns"];

/// Classify a header row (and optionally its file name) into a mission
pub fn detect(headers: &[String], filename: Option<&str>) -> Option<MissionTag> {
    let has = |name: &str| headers.iter().any(|h| h.eq_ignore_ascii_case(name));

    if headers.iter().any(|h| h.to_ascii_lowercase().starts_with("koi_")) || has("kepoi_name") {
        return Some(MissionTag::Kepler);
    }
    if TESS_MARKERS.iter().any(|m| has(m)) {
        return Some(MissionTag::Tess);
    }
    if K2_MARKERS.iter().any(|m| has(m)) {
        return Some(MissionTag::K2);
    }

    filename.and_then(detect_from_filename)
}

fn detect_from_filename(name: &str) -> Option<MissionTag> {
    let lower = name.to_ascii_lowercase();
    if lower.contains("kepler") || lower.contains("keppler") || lower.contains("koi") {
        Some(MissionTag::Kepler)
    } else if lower.contains("tess") || lower.contains("toi") {
        Some(MissionTag::Tess)
    } else if lower.contains("k2") {
        Some(MissionTag::K2)
    } else {
        None
    }
}

/// Pick the mission for a table, failing when nothing identifies it
pub fn resolve(
    explicit: Option<MissionTag>,
    headers: &[String],
    filename: Option<&str>,
) -> PipelineResult<MissionTag> {
    if let Some(mission) = explicit {
        return Ok(mission);
    }
    detect(headers, filename).ok_or_else(|| {
        PipelineError::NoValidSamples(format!(
            "could not detect mission schema from columns [{}]; pass mission=kepler|k2|tess",
            headers.join(", ")
        ))
    })
}
