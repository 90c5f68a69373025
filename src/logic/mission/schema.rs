//! Per-mission column tables
//!
//! Each canonical field lists the catalog columns it may come from, in order of
//! preference, with the factor that converts the column's unit into the
//! canonical one. Columns not named here are ignored.

use super::table::RawRow;
use super::MissionTag;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{CanonicalFeatureRecord, Disposition};

pub const IDENTITY: f64 = 1.0;
pub const DAYS_TO_HOURS: f64 = 24.0;
pub const PERCENT_TO_PPM: f64 = 10_000.0;

/// A catalog column and its conversion into canonical units
#[derive(Debug, Clone, Copy)]
pub struct ColumnSource {
    pub column: &'static str,
    pub factor: f64,
}

const fn col(column: &'static str) -> ColumnSource {
    ColumnSource { column, factor: IDENTITY }
}

const fn scaled(column: &'static str, factor: f64) -> ColumnSource {
    ColumnSource { column, factor }
}

#[derive(Debug)]
pub struct MissionSchema {
    pub mission: MissionTag,
    pub orbital_period: &'static [ColumnSource],
    pub planet_radius: &'static [ColumnSource],
    pub transit_duration: &'static [ColumnSource],
    pub transit_depth: &'static [ColumnSource],
    pub stellar_temp: &'static [ColumnSource],
    pub label_column: &'static str,
    pub id_columns: &'static [&'static str],
    disposition: fn(&str) -> Disposition,
}

impl MissionSchema {
    pub fn parse_disposition(&self, raw: &str) -> Disposition {
        (self.disposition)(&raw.trim().to_ascii_uppercase())
    }

    /// Every column this schema reads
    pub fn known_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.orbital_period
            .iter()
            .chain(self.planet_radius)
            .chain(self.transit_duration)
            .chain(self.transit_depth)
            .chain(self.stellar_temp)
            .map(|c| c.column)
            .chain(std::iter::once(self.label_column))
            .chain(self.id_columns.iter().copied())
    }
}

// ============================================================================
// MISSION TABLES
// ============================================================================

/// Kepler cumulative KOI table
pub static KEPLER: MissionSchema = MissionSchema {
    mission: MissionTag::Kepler,
    orbital_period: &[col("koi_period")],
    planet_radius: &[col("koi_prad")],
    transit_duration: &[col("koi_duration")],
    transit_depth: &[col("koi_depth")],
    stellar_temp: &[col("koi_steff")],
    label_column: "koi_disposition",
    id_columns: &["kepoi_name", "kepler_name", "kepid"],
    disposition: kepler_disposition,
};

/// K2 planets and candidates table (transit depth in percent)
pub static K2: MissionSchema = MissionSchema {
    mission: MissionTag::K2,
    orbital_period: &[col("pl_orbper")],
    planet_radius: &[col("pl_rade")],
    transit_duration: &[col("pl_trandur"), col("pl_trandurh")],
    transit_depth: &[scaled("pl_trandep", PERCENT_TO_PPM)],
    stellar_temp: &[col("st_teff")],
    label_column: "disposition",
    id_columns: &["pl_name", "epic_candname", "epic_hostname"],
    disposition: k2_disposition,
};

/// TESS Objects of Interest table
pub static TESS: MissionSchema = MissionSchema {
    mission: MissionTag::Tess,
    orbital_period: &[col("pl_orbper")],
    planet_radius: &[col("pl_rade")],
    transit_duration: &[col("pl_trandurh"), scaled("pl_trandurd", DAYS_TO_HOURS)],
    transit_depth: &[col("pl_trandep")],
    stellar_temp: &[col("st_teff")],
    label_column: "tfopwg_disp",
    id_columns: &["toi", "tid"],
    disposition: tess_disposition,
};

fn kepler_disposition(raw: &str) -> Disposition {
    match raw {
        "CONFIRMED" => Disposition::Confirmed,
        "CANDIDATE" => Disposition::Candidate,
        "FALSE POSITIVE" => Disposition::FalsePositive,
        _ => Disposition::Unknown,
    }
}

fn k2_disposition(raw: &str) -> Disposition {
    match raw {
        "CONFIRMED" => Disposition::Confirmed,
        "CANDIDATE" => Disposition::Candidate,
        "FALSE POSITIVE" => Disposition::FalsePositive,
        // REFUTED carries no false-positive vetting
        _ => Disposition::Unknown,
    }
}

fn tess_disposition(raw: &str) -> Disposition {
    match raw {
        "KP" | "CP" => Disposition::Confirmed,
        "PC" | "APC" => Disposition::Candidate,
        "FP" | "FA" => Disposition::FalsePositive,
        _ => Disposition::Unknown,
    }
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Map one raw row into the canonical record for the given mission
pub fn adapt(row: &RawRow, mission: MissionTag) -> PipelineResult<CanonicalFeatureRecord> {
    let schema = mission.schema();

    let period = read(row, "orbital_period", schema.orbital_period)?
        .ok_or(PipelineError::MissingFeature { field: "orbital_period" })?;
    let radius = read(row, "planet_radius", schema.planet_radius)?
        .ok_or(PipelineError::MissingFeature { field: "planet_radius" })?;
    let duration = read(row, "transit_duration", schema.transit_duration)?
        .ok_or(PipelineError::MissingFeature { field: "transit_duration" })?;
    let depth = read(row, "transit_depth", schema.transit_depth)?;
    let temp = read(row, "stellar_temp", schema.stellar_temp)?;

    let label = row.get(schema.label_column).map(|raw| schema.parse_disposition(raw));

    Ok(CanonicalFeatureRecord::new(period, radius, duration, depth, temp)?.with_label(label))
}

/// Catalog identifier for a row, if the mission's id columns carry one
pub fn sample_id(row: &RawRow, mission: MissionTag) -> Option<String> {
    mission
        .schema()
        .id_columns
        .iter()
        .find_map(|c| row.get(c))
        .map(str::to_string)
}

fn read(
    row: &RawRow,
    field: &'static str,
    sources: &[ColumnSource],
) -> PipelineResult<Option<f64>> {
    let Some((source, raw)) = sources.iter().find_map(|s| row.get(s.column).map(|v| (s, v))) else {
        return Ok(None);
    };

    let value: f64 = raw.parse().map_err(|_| {
        PipelineError::invalid(field, format!("column '{}' value '{}' is not numeric", source.column, raw))
    })?;

    Ok(Some(value * source.factor))
}
