//! Month-indexed climate table for Malawi
//!
//! Malawi has a single long rainy season (November to March), a cool dry
//! season (April/May to August) and a short hot transition before the rains.
//! The table below is static configuration consumed by
//! [`crate::weather_gen`]; changing a range changes what gets synthesized
//! without touching any generation code.

use serde::{Deserialize, Serialize};

/// Inclusive integer range used for uniform draws
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClimateRange {
    pub low: i32,
    pub high: i32,
}

impl ClimateRange {
    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= f64::from(self.low) && value <= f64::from(self.high)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Rainy,
    Dry,
    Transitional,
}

const DRY_CONDITIONS: &[&str] = &["Sunny", "Partly Cloudy", "Clear"];
const RAINY_CONDITIONS: &[&str] = &[
    "Cloudy",
    "Light Rain",
    "Heavy Rain",
    "Partly Cloudy",
    "Thunderstorms",
];
const TRANSITIONAL_CONDITIONS: &[&str] = &["Partly Cloudy", "Cloudy", "Sunny", "Light Rain"];

impl Season {
    /// Season of a calendar month (1-12). Out-of-range months are treated as
    /// transitional.
    pub fn for_month(month: u32) -> Self {
        match month {
            11 | 12 | 1 | 2 | 3 => Season::Rainy,
            4..=8 => Season::Dry,
            _ => Season::Transitional,
        }
    }

    /// Condition labels the generator may pick from in this season
    pub fn conditions(&self) -> &'static [&'static str] {
        match self {
            Season::Dry => DRY_CONDITIONS,
            Season::Rainy => RAINY_CONDITIONS,
            Season::Transitional => TRANSITIONAL_CONDITIONS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Rainy => "rainy",
            Season::Dry => "dry",
            Season::Transitional => "transitional",
        }
    }
}

/// Climate description for one calendar month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyClimate {
    pub month: u32,
    pub season: Season,
    /// Typical daily low..high in °C
    pub temperature: ClimateRange,
    pub humidity: ClimateRange,
    /// Range a single day's rainfall (mm) is drawn from
    pub daily_rainfall: ClimateRange,
}

impl MonthlyClimate {
    /// Daily minimum is drawn from the bottom of the typical range
    pub fn min_temperature_range(&self) -> ClimateRange {
        ClimateRange::new(
            self.temperature.low,
            self.temperature.low + TEMPERATURE_SPREAD,
        )
    }

    /// Daily maximum is drawn from the top of the typical range
    pub fn max_temperature_range(&self) -> ClimateRange {
        ClimateRange::new(
            self.temperature.high - TEMPERATURE_SPREAD,
            self.temperature.high,
        )
    }
}

/// Width (°C) of the min/max temperature draw windows
pub const TEMPERATURE_SPREAD: i32 = 3;

/// Wind speed draw range in km/h; the same all year
pub const WIND_SPEED_KMH: ClimateRange = ClimateRange::new(5, 25);

const DRY_DAY_RAINFALL: ClimateRange = ClimateRange::new(0, 20);
const WET_DAY_RAINFALL: ClimateRange = ClimateRange::new(0, 50);

const fn entry(
    month: u32,
    season: Season,
    temperature: (i32, i32),
    humidity: (i32, i32),
    daily_rainfall: ClimateRange,
) -> MonthlyClimate {
    MonthlyClimate {
        month,
        season,
        temperature: ClimateRange::new(temperature.0, temperature.1),
        humidity: ClimateRange::new(humidity.0, humidity.1),
        daily_rainfall,
    }
}

pub static CLIMATE_TABLE: [MonthlyClimate; 12] = [
    entry(1, Season::Rainy, (23, 31), (75, 85), WET_DAY_RAINFALL),
    entry(2, Season::Rainy, (23, 30), (75, 85), WET_DAY_RAINFALL),
    entry(3, Season::Rainy, (22, 29), (70, 80), WET_DAY_RAINFALL),
    entry(4, Season::Dry, (20, 28), (65, 75), DRY_DAY_RAINFALL),
    entry(5, Season::Dry, (17, 26), (60, 70), DRY_DAY_RAINFALL),
    entry(6, Season::Dry, (15, 24), (55, 65), DRY_DAY_RAINFALL),
    entry(7, Season::Dry, (15, 24), (55, 65), DRY_DAY_RAINFALL),
    entry(8, Season::Dry, (17, 27), (55, 65), DRY_DAY_RAINFALL),
    entry(9, Season::Transitional, (20, 30), (60, 70), WET_DAY_RAINFALL),
    entry(10, Season::Transitional, (23, 33), (65, 75), WET_DAY_RAINFALL),
    entry(11, Season::Rainy, (24, 32), (70, 80), WET_DAY_RAINFALL),
    entry(12, Season::Rainy, (24, 31), (75, 85), WET_DAY_RAINFALL),
];

/// Climate entry for a month (1-12); `None` outside that range
pub fn climate_for_month(month: u32) -> Option<&'static MonthlyClimate> {
    CLIMATE_TABLE.get(month.checked_sub(1)? as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_month() {
        for (index, entry) in CLIMATE_TABLE.iter().enumerate() {
            assert_eq!(entry.month as usize, index + 1);
            assert_eq!(entry.season, Season::for_month(entry.month));
        }
    }

    #[test]
    fn test_seasons() {
        for m in [11, 12, 1, 2, 3] {
            assert_eq!(Season::for_month(m), Season::Rainy);
        }
        for m in [4, 5, 6, 7, 8] {
            assert_eq!(Season::for_month(m), Season::Dry);
        }
        assert_eq!(Season::for_month(9), Season::Transitional);
        assert_eq!(Season::for_month(10), Season::Transitional);
    }

    #[test]
    fn test_dry_months_have_narrow_rainfall_range() {
        for entry in CLIMATE_TABLE.iter().filter(|c| c.season == Season::Dry) {
            assert_eq!(entry.daily_rainfall, ClimateRange::new(0, 20));
        }
    }

    #[test]
    fn test_ranges_are_ordered() {
        for entry in CLIMATE_TABLE.iter() {
            assert!(entry.temperature.low < entry.temperature.high);
            assert!(entry.humidity.low <= entry.humidity.high);
            assert!(entry.daily_rainfall.low >= 0);
            assert!(entry.min_temperature_range().high <= entry.max_temperature_range().high);
        }
    }

    #[test]
    fn test_climate_for_month_bounds() {
        assert!(climate_for_month(0).is_none());
        assert!(climate_for_month(13).is_none());
        assert_eq!(climate_for_month(7).map(|c| c.season), Some(Season::Dry));
    }

    #[test]
    fn test_dry_condition_set() {
        assert_eq!(Season::Dry.conditions(), &["Sunny", "Partly Cloudy", "Clear"]);
        assert!(!Season::Dry.conditions().contains(&"Heavy Rain"));
    }
}
