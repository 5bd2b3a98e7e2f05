//! Weather data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day's weather for one district
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub id: Uuid,
    pub region_id: Uuid,
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: f64,
    /// Millimetres, never negative
    pub rainfall: f64,
    /// km/h
    pub wind_speed: Option<f64>,
    pub weather_condition: String,
}

/// A snapshot that has been synthesized but not stored yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWeatherSnapshot {
    pub region_id: Uuid,
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: Option<f64>,
    pub weather_condition: String,
}

impl NewWeatherSnapshot {
    pub fn into_snapshot(self, id: Uuid) -> WeatherSnapshot {
        WeatherSnapshot {
            id,
            region_id: self.region_id,
            date: self.date,
            temperature_max: self.temperature_max,
            temperature_min: self.temperature_min,
            humidity: self.humidity,
            rainfall: self.rainfall,
            wind_speed: self.wind_speed,
            weather_condition: self.weather_condition,
        }
    }
}

/// Row of the public weather history feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherHistoryPoint {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub condition: String,
}

impl From<&WeatherSnapshot> for WeatherHistoryPoint {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        Self {
            date: snapshot.date,
            temp_max: snapshot.temperature_max,
            temp_min: snapshot.temperature_min,
            humidity: snapshot.humidity,
            rainfall: snapshot.rainfall,
            condition: snapshot.weather_condition.clone(),
        }
    }
}
