//! Reference data for manual entry: parameter ranges and example planets

use serde::{Serialize, Serializer};

use crate::logic::pipeline::ManualParameters;

#[derive(Debug, Clone, Serialize)]
pub struct ParameterRange {
    #[serde(skip)]
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    pub typical_range: [f64; 2],
    pub unit: &'static str,
    pub description: &'static str,
    #[serde(serialize_with = "ordered_map")]
    pub examples: &'static [(&'static str, f64)],
}

fn ordered_map<S: Serializer>(
    entries: &&'static [(&'static str, f64)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(k, v)| (*k, *v)))
}

/// Ranges observed across known exoplanets, in layout order
pub static PARAMETER_RANGES: [ParameterRange; 5] = [
    ParameterRange {
        field: "orbital_period",
        min: 0.1,
        max: 1000.0,
        typical_range: [1.0, 365.0],
        unit: "days",
        description: "Time for planet to complete one orbit",
        examples: &[("Earth-like", 365.0), ("Hot Jupiter", 3.5), ("Super-Earth", 50.0)],
    },
    ParameterRange {
        field: "planet_radius",
        min: 0.1,
        max: 30.0,
        typical_range: [0.5, 20.0],
        unit: "Earth radii (R⊕)",
        description: "Size of planet compared to Earth",
        examples: &[
            ("Earth-like", 1.0),
            ("Hot Jupiter", 11.0),
            ("Super-Earth", 1.8),
            ("Neptune-like", 3.9),
        ],
    },
    ParameterRange {
        field: "transit_duration",
        min: 0.1,
        max: 24.0,
        typical_range: [1.0, 12.0],
        unit: "hours",
        description: "How long the planet blocks the star's light",
        examples: &[("Earth-like", 13.0), ("Hot Jupiter", 4.0), ("Super-Earth", 6.0)],
    },
    ParameterRange {
        field: "transit_depth",
        min: 1.0,
        max: 100000.0,
        typical_range: [10.0, 10000.0],
        unit: "parts per million (ppm)",
        description: "How much the star dims during transit",
        examples: &[("Earth-like", 84.0), ("Hot Jupiter", 10000.0), ("Super-Earth", 200.0)],
    },
    ParameterRange {
        field: "stellar_temp",
        min: 2000.0,
        max: 10000.0,
        typical_range: [4000.0, 7000.0],
        unit: "Kelvin (K)",
        description: "Temperature of the host star",
        examples: &[("Sun-like", 5778.0), ("Hot star", 7000.0), ("Cool star", 4000.0)],
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ExamplePlanet {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: ManualParameters,
    pub expected_result: &'static str,
}

fn example(
    name: &'static str,
    description: &'static str,
    values: [f64; 5],
    expected_result: &'static str,
) -> ExamplePlanet {
    let [orbital_period, planet_radius, transit_duration, depth, temp] = values;
    ExamplePlanet {
        name,
        description,
        parameters: ManualParameters {
            orbital_period,
            planet_radius,
            transit_duration,
            transit_depth: Some(depth),
            stellar_temp: Some(temp),
        },
        expected_result,
    }
}

pub fn example_planets() -> Vec<ExamplePlanet> {
    vec![
        example(
            "Earth-like Planet",
            "Planet similar to Earth in size and orbit",
            [365.0, 1.0, 13.0, 84.0, 5778.0],
            "High probability of being a planet",
        ),
        example(
            "Hot Jupiter",
            "Large gas giant in close orbit",
            [3.5, 11.0, 4.0, 10000.0, 6000.0],
            "Very high probability of being a planet",
        ),
        example(
            "Super-Earth",
            "Rocky planet larger than Earth",
            [50.0, 1.8, 6.0, 200.0, 5500.0],
            "High probability of being a planet",
        ),
        example(
            "Neptune-like",
            "Ice giant similar to Neptune",
            [120.0, 3.9, 8.0, 1500.0, 5200.0],
            "High probability of being a planet",
        ),
        example(
            "Suspicious Signal",
            "Parameters that might indicate false positive",
            [0.5, 0.2, 0.3, 10.0, 9000.0],
            "Likely a false positive",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{extract, FEATURE_LAYOUT};

    #[test]
    fn test_ranges_follow_layout() {
        let fields: Vec<_> = PARAMETER_RANGES.iter().map(|r| r.field).collect();
        assert_eq!(fields, FEATURE_LAYOUT);
        for range in &PARAMETER_RANGES {
            assert!(range.min < range.typical_range[0]);
            assert!(range.typical_range[1] <= range.max);
        }
    }

    #[test]
    fn test_examples_extract_cleanly() {
        let examples = example_planets();
        assert_eq!(examples.len(), 5);
        for planet in examples {
            let record = planet.parameters.to_record().unwrap();
            let extraction = extract(&record).unwrap();
            assert!(extraction.imputed.is_empty(), "{}", planet.name);
        }
    }

    #[test]
    fn test_examples_serialize_in_declared_order() {
        let json = serde_json::to_string(&PARAMETER_RANGES[1]).unwrap();
        let earth = json.find("Earth-like").unwrap();
        let neptune = json.find("Neptune-like").unwrap();
        assert!(earth < neptune);
        assert!(!json.contains("\"field\""));
    }
}
