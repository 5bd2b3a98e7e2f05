//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Chichewa
    Ny,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ny => "ny",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ny => "Chichewa",
        }
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "ny" => Ok(Language::Ny),
            other => Err(UnknownVariant::new("language", other)),
        }
    }
}

/// Returned when a stored or submitted code does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Text carried in both supported languages
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bilingual {
    pub en: String,
    pub ny: String,
}

impl Bilingual {
    pub fn new(en: impl Into<String>, ny: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ny: ny.into(),
        }
    }

    /// Text for the language, falling back to English when the Chichewa
    /// variant was never filled in.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Ny if !self.ny.trim().is_empty() => &self.ny,
            _ => &self.en,
        }
    }
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    /// The `days` days ending at (and including) `end`
    pub fn trailing(end: chrono::NaiveDate, days: i64) -> Self {
        Self {
            start: end - chrono::Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_language_codes() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!("ny".parse::<Language>(), Ok(Language::Ny));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Ny.code(), "ny");
    }

    #[test]
    fn test_bilingual_falls_back_to_english() {
        let text = Bilingual::new("Maize", "");
        assert_eq!(text.get(Language::Ny), "Maize");

        let text = Bilingual::new("Maize", "Chimanga");
        assert_eq!(text.get(Language::Ny), "Chimanga");
        assert_eq!(text.get(Language::En), "Maize");
    }

    #[test]
    fn test_trailing_range() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let range = DateRange::trailing(end, 7);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert!(range.contains(end));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
    }
}
