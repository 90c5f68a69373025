//! Canonical Feature Record
//!
//! Mission-independent, unit-normalized view of one candidate.
//! Absent optional fields stay `None` until extraction; zero is a real value.

use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineError, PipelineResult};

/// Ground-truth disposition, normalized across mission vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Confirmed,
    Candidate,
    FalsePositive,
    /// Present in the catalog but not dispositioned (or refuted without FP status)
    Unknown,
}

impl Disposition {
    /// Binary training target: candidates count as planets
    pub fn is_planet(&self) -> Option<bool> {
        match self {
            Disposition::Confirmed | Disposition::Candidate => Some(true),
            Disposition::FalsePositive => Some(false),
            Disposition::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalFeatureRecord {
    orbital_period_days: f64,
    planet_radius_earth_radii: f64,
    transit_duration_hours: f64,
    transit_depth_ppm: Option<f64>,
    stellar_temp_kelvin: Option<f64>,
    label: Option<Disposition>,
}

impl CanonicalFeatureRecord {
    /// Build a record, enforcing that every present value is finite and non-negative
    pub fn new(
        orbital_period_days: f64,
        planet_radius_earth_radii: f64,
        transit_duration_hours: f64,
        transit_depth_ppm: Option<f64>,
        stellar_temp_kelvin: Option<f64>,
    ) -> PipelineResult<Self> {
        Ok(Self {
            orbital_period_days: check("orbital_period", orbital_period_days)?,
            planet_radius_earth_radii: check("planet_radius", planet_radius_earth_radii)?,
            transit_duration_hours: check("transit_duration", transit_duration_hours)?,
            transit_depth_ppm: transit_depth_ppm.map(|v| check("transit_depth", v)).transpose()?,
            stellar_temp_kelvin: stellar_temp_kelvin.map(|v| check("stellar_temp", v)).transpose()?,
            label: None,
        })
    }

    pub fn with_label(mut self, label: Option<Disposition>) -> Self {
        self.label = label;
        self
    }

    pub fn orbital_period_days(&self) -> f64 {
        self.orbital_period_days
    }

    pub fn planet_radius_earth_radii(&self) -> f64 {
        self.planet_radius_earth_radii
    }

    pub fn transit_duration_hours(&self) -> f64 {
        self.transit_duration_hours
    }

    pub fn transit_depth_ppm(&self) -> Option<f64> {
        self.transit_depth_ppm
    }

    pub fn stellar_temp_kelvin(&self) -> Option<f64> {
        self.stellar_temp_kelvin
    }

    pub fn label(&self) -> Option<Disposition> {
        self.label
    }
}

fn check(field: &'static str, value: f64) -> PipelineResult<f64> {
    if !value.is_finite() {
        return Err(PipelineError::invalid(field, format!("{} is not a finite number", value)));
    }
    if value < 0.0 {
        return Err(PipelineError::invalid(field, format!("{} is negative", value)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_stay_absent() {
        let record = CanonicalFeatureRecord::new(10.0, 2.0, 3.0, None, None).unwrap();
        assert_eq!(record.transit_depth_ppm(), None);
        assert_eq!(record.stellar_temp_kelvin(), None);
        assert_eq!(record.label(), None);
    }

    #[test]
    fn test_zero_is_kept_as_observation() {
        let record = CanonicalFeatureRecord::new(10.0, 2.0, 3.0, Some(0.0), None).unwrap();
        assert_eq!(record.transit_depth_ppm(), Some(0.0));
    }

    #[test]
    fn test_negative_and_non_finite_rejected() {
        let err = CanonicalFeatureRecord::new(-1.0, 2.0, 3.0, None, None).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidValue { field: "orbital_period", .. }));

        let err = CanonicalFeatureRecord::new(1.0, f64::NAN, 3.0, None, None).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidValue { field: "planet_radius", .. }));

        let err = CanonicalFeatureRecord::new(1.0, 2.0, 3.0, None, Some(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidValue { field: "stellar_temp", .. }));
    }

    #[test]
    fn test_disposition_targets() {
        assert_eq!(Disposition::Confirmed.is_planet(), Some(true));
        assert_eq!(Disposition::Candidate.is_planet(), Some(true));
        assert_eq!(Disposition::FalsePositive.is_planet(), Some(false));
        assert_eq!(Disposition::Unknown.is_planet(), None);
    }
}
