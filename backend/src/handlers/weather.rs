//! HTTP handlers for district weather

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::weather::{RegionWeather, WeatherHistory};
use crate::services::WeatherService;
use crate::AppState;
use shared::WeatherSnapshot;

/// Last week of weather for every district
pub async fn list_weather(State(state): State<AppState>) -> AppResult<Json<Vec<RegionWeather>>> {
    let today = state.config.advisory.today();
    let service = WeatherService::new(state.store);
    let weather = service.all_regions(today).await?;
    Ok(Json(weather))
}

/// Today's snapshot for a district, created on first request
pub async fn get_today_weather(
    State(state): State<AppState>,
    Path(region_id): Path<Uuid>,
) -> AppResult<Json<WeatherSnapshot>> {
    let today = state.config.advisory.today();
    let service = WeatherService::new(state.store);
    let snapshot = service.get_or_create_snapshot(region_id, today).await?;
    Ok(Json(snapshot))
}

/// JSON weather history feed for a district
pub async fn get_weather_history(
    State(state): State<AppState>,
    Path(region_id): Path<Uuid>,
) -> AppResult<Json<WeatherHistory>> {
    let today = state.config.advisory.today();
    let service = WeatherService::new(state.store);
    let history = service.history(region_id, today).await?;
    Ok(Json(history))
}
