//! Health check and statistics handlers

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::error::AppResult;
use crate::services::StatsService;
use crate::store::StoreStats;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub database: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check store connectivity
    let db_status = match state.store.ping().await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Store ping failed");
            "disconnected".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend_name().to_string(),
        database: db_status,
    })
}

/// Platform totals
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StoreStats>> {
    let service = StatsService::new(state.store);
    let stats = service.stats(Utc::now()).await?;
    Ok(Json(stats))
}
