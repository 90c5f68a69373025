//! Mission Module - Schema Adapter
//!
//! Kepler, K2 and TESS catalogs name (and sometimes scale) the same physical
//! quantities differently. The mission is classified once per table, then each
//! row is adapted through that mission's static column table.

pub mod detect;
pub mod schema;
pub mod table;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use detect::{detect, resolve};
pub use schema::{adapt, sample_id, MissionSchema};
pub use table::{RawRow, Table};

/// Source catalog of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionTag {
    Kepler,
    K2,
    #[serde(rename = "TESS")]
    Tess,
}

impl MissionTag {
    pub const ALL: [MissionTag; 3] = [MissionTag::Kepler, MissionTag::K2, MissionTag::Tess];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionTag::Kepler => "Kepler",
            MissionTag::K2 => "K2",
            MissionTag::Tess => "TESS",
        }
    }

    pub fn schema(&self) -> &'static MissionSchema {
        match self {
            MissionTag::Kepler => &schema::KEPLER,
            MissionTag::K2 => &schema::K2,
            MissionTag::Tess => &schema::TESS,
        }
    }
}

impl std::fmt::Display for MissionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMission(pub String);

impl std::fmt::Display for UnknownMission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown mission '{}', expected one of: kepler, k2, tess", self.0)
    }
}

impl std::error::Error for UnknownMission {}

impl FromStr for MissionTag {
    type Err = UnknownMission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kepler" | "keppler" | "koi" => Ok(MissionTag::Kepler),
            "k2" => Ok(MissionTag::K2),
            "tess" | "toi" => Ok(MissionTag::Tess),
            _ => Err(UnknownMission(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mission() {
        assert_eq!("kepler".parse::<MissionTag>(), Ok(MissionTag::Kepler));
        assert_eq!(" K2 ".parse::<MissionTag>(), Ok(MissionTag::K2));
        assert_eq!("TESS".parse::<MissionTag>(), Ok(MissionTag::Tess));
        assert!("hubble".parse::<MissionTag>().is_err());
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&MissionTag::Tess).unwrap(), "\"TESS\"");
        assert_eq!(serde_json::to_string(&MissionTag::K2).unwrap(), "\"K2\"");
        for mission in MissionTag::ALL {
            assert_eq!(mission.schema().mission, mission);
        }
    }
}
