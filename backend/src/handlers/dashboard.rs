//! Farmer dashboard handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::Dashboard;
use crate::services::{AdvisoryService, DashboardService};
use crate::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Dashboard>> {
    let today = state.config.advisory.today();
    let advisory = AdvisoryService::new(state.store.clone(), &state.config);
    let service = DashboardService::new(state.store.clone(), advisory);
    let dashboard = service.dashboard(current_user.0.user_id, today).await?;
    Ok(Json(dashboard))
}
