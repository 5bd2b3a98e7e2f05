//! Seasonal farming calendar

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Bilingual;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for 1-12
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Expected farming activity for a crop in a district during one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEntry {
    pub id: Uuid,
    pub crop_id: Uuid,
    pub region_id: Uuid,
    pub month: u32,
    pub activity_en: String,
    pub activity_ny: String,
    pub description_en: String,
    pub description_ny: String,
}

impl CalendarEntry {
    pub fn activity(&self) -> Bilingual {
        Bilingual::new(self.activity_en.clone(), self.activity_ny.clone())
    }

    pub fn description(&self) -> Bilingual {
        Bilingual::new(self.description_en.clone(), self.description_ny.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarEntry {
    pub crop_id: Uuid,
    pub region_id: Uuid,
    pub month: u32,
    pub activity_en: String,
    pub activity_ny: String,
    pub description_en: String,
    pub description_ny: String,
}
