//! HTTP handlers for market prices

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::market::{PriceHistory, RecordPriceInput};
use crate::services::MarketService;
use crate::AppState;
use shared::MarketPrice;

/// JSON price history feed for a crop
pub async fn get_price_history(
    State(state): State<AppState>,
    Path(crop_id): Path<Uuid>,
) -> AppResult<Json<PriceHistory>> {
    let today = state.config.advisory.today();
    let service = MarketService::new(state.store);
    let history = service.history(crop_id, today).await?;
    Ok(Json(history))
}

/// Record a market price
pub async fn record_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordPriceInput>,
) -> AppResult<(StatusCode, Json<MarketPrice>)> {
    let today = state.config.advisory.today();
    let service = MarketService::new(state.store);
    let price = service.record_price(input, today).await?;
    tracing::debug!(user = %current_user.0.username, price_id = %price.id, "Price recorded");
    Ok((StatusCode::CREATED, Json(price)))
}
