//! Farming calendar handler

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Datelike;

use crate::error::AppResult;
use crate::services::calendar::{CalendarQuery, CalendarView};
use crate::services::CalendarService;
use crate::AppState;

/// Activities for a month (default: current) and the full year
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarView>> {
    let current_month = state.config.advisory.today().month();
    let service = CalendarService::new(state.store);
    let view = service.month_view(query, current_month).await?;
    Ok(Json(view))
}
