//! Malawi districts and macro-regions

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{GpsCoordinates, UnknownVariant};

/// One of Malawi's three administrative macro-regions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MacroRegion {
    Northern,
    Central,
    Southern,
}

impl MacroRegion {
    pub const ALL: [MacroRegion; 3] = [
        MacroRegion::Northern,
        MacroRegion::Central,
        MacroRegion::Southern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroRegion::Northern => "northern",
            MacroRegion::Central => "central",
            MacroRegion::Southern => "southern",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MacroRegion::Northern => "Northern Region",
            MacroRegion::Central => "Central Region",
            MacroRegion::Southern => "Southern Region",
        }
    }
}

impl FromStr for MacroRegion {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "northern" => Ok(MacroRegion::Northern),
            "central" => Ok(MacroRegion::Central),
            "southern" => Ok(MacroRegion::Southern),
            other => Err(UnknownVariant::new("macro region", other)),
        }
    }
}

/// A district used as a farmer's location and as the unit of weather data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub region: MacroRegion,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_meters: Option<i32>,
    pub annual_rainfall_mm: Option<i32>,
}

impl Region {
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GpsCoordinates::new(lat, lon)),
            _ => None,
        }
    }

    /// "Lilongwe - Central Region"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.region.label())
    }
}

/// Fields needed to create a district during seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegion {
    pub name: String,
    pub region: MacroRegion,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_meters: Option<i32>,
    pub annual_rainfall_mm: Option<i32>,
}
