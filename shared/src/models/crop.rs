//! Crop reference data

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{Bilingual, UnknownVariant};

/// Broad crop family, drives the disease lookup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Cereal,
    Legume,
    Tuber,
    Vegetable,
    Fruit,
    Cash,
}

impl CropType {
    pub const ALL: [CropType; 6] = [
        CropType::Cereal,
        CropType::Legume,
        CropType::Tuber,
        CropType::Vegetable,
        CropType::Fruit,
        CropType::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Cereal => "cereal",
            CropType::Legume => "legume",
            CropType::Tuber => "tuber",
            CropType::Vegetable => "vegetable",
            CropType::Fruit => "fruit",
            CropType::Cash => "cash",
        }
    }

    /// Plural label shown to farmers
    pub fn label(&self) -> &'static str {
        match self {
            CropType::Cereal => "Cereals",
            CropType::Legume => "Legumes",
            CropType::Tuber => "Tubers",
            CropType::Vegetable => "Vegetables",
            CropType::Fruit => "Fruits",
            CropType::Cash => "Cash Crops",
        }
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CropType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("crop type", s))
    }
}

/// A crop grown in Malawi
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crop {
    pub id: Uuid,
    pub name_en: String,
    pub name_ny: String,
    pub crop_type: CropType,
    pub scientific_name: Option<String>,
    pub planting_season: String,
    pub harvest_season: String,
    pub water_requirement: String,
    pub soil_type: String,
    pub growing_period_days: i32,
    pub suitable_regions: BTreeSet<Uuid>,
}

impl Crop {
    pub fn name(&self) -> Bilingual {
        Bilingual::new(self.name_en.clone(), self.name_ny.clone())
    }

    /// Chichewa name, or the English one when no translation was recorded
    pub fn name_ny_or_en(&self) -> &str {
        if self.name_ny.trim().is_empty() {
            &self.name_en
        } else {
            &self.name_ny
        }
    }

    pub fn is_suitable_for(&self, region_id: Uuid) -> bool {
        self.suitable_regions.contains(&region_id)
    }
}

/// Fields needed to create a crop during seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCrop {
    pub name_en: String,
    pub name_ny: String,
    pub crop_type: CropType,
    pub scientific_name: Option<String>,
    pub planting_season: String,
    pub harvest_season: String,
    pub water_requirement: String,
    pub soil_type: String,
    pub growing_period_days: i32,
    pub suitable_regions: BTreeSet<Uuid>,
}

/// Filters accepted when listing crops
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropFilter {
    pub region_id: Option<Uuid>,
    pub crop_type: Option<CropType>,
}

impl CropFilter {
    pub fn matches(&self, crop: &Crop) -> bool {
        self.region_id.map_or(true, |r| crop.is_suitable_for(r))
            && self.crop_type.map_or(true, |t| crop.crop_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_type_round_trip_through_code() {
        for crop_type in CropType::ALL {
            assert_eq!(crop_type.as_str().parse::<CropType>(), Ok(crop_type));
        }
        assert!("grain".parse::<CropType>().is_err());
    }

    #[test]
    fn test_crop_type_labels() {
        assert_eq!(CropType::Cash.label(), "Cash Crops");
        assert_eq!(CropType::Cereal.to_string(), "Cereals");
    }
}
