//! Common diseases by crop type

use serde::Serialize;

use crate::models::CropType;

/// Diseases to watch for and how to prevent them, for one crop family
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DiseaseProfile {
    pub diseases: &'static [&'static str],
    pub prevention_en: &'static str,
    pub prevention_ny: &'static str,
}

impl DiseaseProfile {
    pub fn disease_list(&self) -> String {
        self.diseases.join(", ")
    }
}

pub const CEREAL: DiseaseProfile = DiseaseProfile {
    diseases: &["Rust", "Smut", "Blight"],
    prevention_en: "Use resistant varieties, proper spacing, crop rotation",
    prevention_ny: "Gwiritsani ntchito mitundu yolimba ku matenda, bzalani motalikirana bwino, sinthasinthani mbewu",
};

pub const LEGUME: DiseaseProfile = DiseaseProfile {
    diseases: &["Root rot", "Leaf spot", "Bacterial blight"],
    prevention_en: "Avoid waterlogging, use clean seeds, proper ventilation",
    prevention_ny: "Pewani madzi ochuluka m'munda, gwiritsani ntchito mbewu zoyera, lolani mpweya kuyenda",
};

pub const TUBER: DiseaseProfile = DiseaseProfile {
    diseases: &["Blight", "Bacterial wilt", "Virus diseases"],
    prevention_en: "Use certified planting material, hill properly, rotate crops",
    prevention_ny: "Gwiritsani ntchito mbewu zovomerezeka, kwezani mizere bwino, sinthasinthani mbewu",
};

pub const VEGETABLE: DiseaseProfile = DiseaseProfile {
    diseases: &["Damping off", "Powdery mildew", "Bacterial spot"],
    prevention_en: "Good sanitation, proper spacing, avoid overhead watering",
    prevention_ny: "Sungani ukhondo m'munda, bzalani motalikirana, musathirire pamwamba pa masamba",
};

pub const FRUIT: DiseaseProfile = DiseaseProfile {
    diseases: &["Fruit fly", "Anthracnose", "Root rot"],
    prevention_en: "Proper pruning, harvest timely, good drainage",
    prevention_ny: "Dulirani nthambi bwino, tchani pa nthawi yake, onetsetsani kuti madzi akutuluka",
};

/// Profile for a crop type.
///
/// Cash crops have no profile of their own and use the cereal one.
pub fn profile_for(crop_type: CropType) -> &'static DiseaseProfile {
    match crop_type {
        CropType::Cereal => &CEREAL,
        CropType::Legume => &LEGUME,
        CropType::Tuber => &TUBER,
        CropType::Vegetable => &VEGETABLE,
        CropType::Fruit => &FRUIT,
        CropType::Cash => &CEREAL,
    }
}
