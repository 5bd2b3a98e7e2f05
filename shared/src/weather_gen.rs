//! Synthetic daily weather
//!
//! There is no live weather feed; each district gets one synthesized
//! snapshot per day, drawn from [`crate::climate::CLIMATE_TABLE`]. The random
//! source is passed in so callers decide between entropy and a seeded or
//! mocked generator.

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::climate::{ClimateRange, MonthlyClimate, CLIMATE_TABLE, WIND_SPEED_KMH};
use crate::models::NewWeatherSnapshot;

/// Draw a day of weather for `region_id` on `date`
pub fn synthesize<R: Rng + ?Sized>(
    region_id: Uuid,
    date: NaiveDate,
    rng: &mut R,
) -> NewWeatherSnapshot {
    // chrono months are always 1..=12
    let climate = &CLIMATE_TABLE[date.month0() as usize];
    synthesize_with(climate, region_id, date, rng)
}

/// Same as [`synthesize`] but against an explicit climate entry
pub fn synthesize_with<R: Rng + ?Sized>(
    climate: &MonthlyClimate,
    region_id: Uuid,
    date: NaiveDate,
    rng: &mut R,
) -> NewWeatherSnapshot {
    let temperature_min = draw(rng, climate.min_temperature_range());
    let temperature_max = draw(rng, climate.max_temperature_range());
    let humidity = draw(rng, climate.humidity);
    let rainfall = draw(rng, climate.daily_rainfall).max(0.0);
    let wind_speed = draw(rng, WIND_SPEED_KMH);

    let weather_condition = climate
        .season
        .conditions()
        .choose(rng)
        .copied()
        .unwrap_or("Partly Cloudy")
        .to_string();

    tracing::trace!(
        %region_id,
        %date,
        season = climate.season.as_str(),
        temperature_max,
        rainfall,
        "synthesized weather"
    );

    NewWeatherSnapshot {
        region_id,
        date,
        temperature_max,
        temperature_min,
        humidity,
        rainfall,
        wind_speed: Some(wind_speed),
        weather_condition,
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, range: ClimateRange) -> f64 {
    f64::from(rng.gen_range(range.low..=range.high))
}
