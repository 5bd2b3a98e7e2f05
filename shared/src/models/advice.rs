//! Advice records

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::types::{Bilingual, Language, UnknownVariant};

/// Number of days an advice record stays relevant unless told otherwise
pub const DEFAULT_VALIDITY_DAYS: i32 = 7;

/// The six kinds of advice a farmer can ask for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdviceType {
    Planting,
    Care,
    Disease,
    Harvest,
    Weather,
    #[default]
    General,
}

impl AdviceType {
    pub const ALL: [AdviceType; 6] = [
        AdviceType::Planting,
        AdviceType::Care,
        AdviceType::Disease,
        AdviceType::Harvest,
        AdviceType::Weather,
        AdviceType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceType::Planting => "planting",
            AdviceType::Care => "care",
            AdviceType::Disease => "disease",
            AdviceType::Harvest => "harvest",
            AdviceType::Weather => "weather",
            AdviceType::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdviceType::Planting => "Planting Advice",
            AdviceType::Care => "Care & Maintenance",
            AdviceType::Disease => "Disease Management",
            AdviceType::Harvest => "Harvest Advice",
            AdviceType::Weather => "Weather-based Advice",
            AdviceType::General => "General Advice",
        }
    }

    /// Parse a submitted advice type, treating anything unrecognised as
    /// [`AdviceType::General`].
    pub fn parse_lenient(value: &str) -> Self {
        value.trim().to_ascii_lowercase().parse().unwrap_or_default()
    }
}

impl FromStr for AdviceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdviceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("advice type", s))
    }
}

impl std::fmt::Display for AdviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered output of the rule engine, before it is tied to a farmer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdviceContent {
    pub title_en: String,
    pub title_ny: String,
    pub content_en: String,
    pub content_ny: String,
    pub is_urgent: bool,
}

/// A stored piece of advice. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdviceRecord {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub crop_id: Uuid,
    pub advice_type: AdviceType,
    pub title_en: String,
    pub title_ny: String,
    pub content_en: String,
    pub content_ny: String,
    pub weather_snapshot_id: Option<Uuid>,
    pub is_urgent: bool,
    pub validity_days: i32,
    pub created_at: DateTime<Utc>,
}

impl AdviceRecord {
    pub fn title(&self) -> Bilingual {
        Bilingual::new(self.title_en.clone(), self.title_ny.clone())
    }

    pub fn content(&self) -> Bilingual {
        Bilingual::new(self.content_en.clone(), self.content_ny.clone())
    }

    /// Title and body in the requested language
    pub fn localized(&self, language: Language) -> (String, String) {
        (
            self.title().get(language).to_string(),
            self.content().get(language).to_string(),
        )
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(i64::from(self.validity_days))
    }

    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }
}

/// Advice ready to be persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdviceRecord {
    pub farmer_id: Uuid,
    pub crop_id: Uuid,
    pub advice_type: AdviceType,
    pub content: AdviceContent,
    pub weather_snapshot_id: Option<Uuid>,
    pub validity_days: i32,
}

impl NewAdviceRecord {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> AdviceRecord {
        AdviceRecord {
            id,
            farmer_id: self.farmer_id,
            crop_id: self.crop_id,
            advice_type: self.advice_type,
            title_en: self.content.title_en,
            title_ny: self.content.title_ny,
            content_en: self.content.content_en,
            content_ny: self.content.content_ny,
            weather_snapshot_id: self.weather_snapshot_id,
            is_urgent: self.content.is_urgent,
            validity_days: self.validity_days,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_parse_falls_back_to_general() {
        assert_eq!(AdviceType::parse_lenient("planting"), AdviceType::Planting);
        assert_eq!(AdviceType::parse_lenient(" Disease "), AdviceType::Disease);
        assert_eq!(AdviceType::parse_lenient("unknown_value"), AdviceType::General);
        assert_eq!(AdviceType::parse_lenient(""), AdviceType::General);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!("unknown_value".parse::<AdviceType>().is_err());
    }

    #[test]
    fn test_expiry_uses_validity_window() {
        let created_at = Utc::now();
        let record = NewAdviceRecord {
            farmer_id: Uuid::new_v4(),
            crop_id: Uuid::new_v4(),
            advice_type: AdviceType::Care,
            content: AdviceContent {
                title_en: "Care Instructions for Maize".to_string(),
                title_ny: String::new(),
                content_en: "body".to_string(),
                content_ny: String::new(),
                is_urgent: false,
            },
            weather_snapshot_id: None,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
        .into_record(Uuid::new_v4(), created_at);

        assert_eq!(record.expires_at(), created_at + Duration::days(7));
        assert!(record.is_current(created_at + Duration::days(6)));
        assert!(!record.is_current(created_at + Duration::days(7)));
        assert_eq!(record.localized(Language::Ny).0, "Care Instructions for Maize");
    }
}
