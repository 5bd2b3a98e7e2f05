//! HTTP handlers for districts and the crop catalogue

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::crop::{CropDetail, CropQuery};
use crate::services::CropService;
use crate::AppState;
use shared::{Crop, Region};

/// List all districts
pub async fn list_regions(State(state): State<AppState>) -> AppResult<Json<Vec<Region>>> {
    let service = CropService::new(state.store);
    let regions = service.list_regions().await?;
    Ok(Json(regions))
}

/// List crops, optionally filtered by district and type
pub async fn list_crops(
    State(state): State<AppState>,
    Query(query): Query<CropQuery>,
) -> AppResult<Json<Vec<Crop>>> {
    let service = CropService::new(state.store);
    let crops = service.list_crops(query).await?;
    Ok(Json(crops))
}

/// Crop with its calendar and recent prices
pub async fn get_crop(
    State(state): State<AppState>,
    Path(crop_id): Path<Uuid>,
) -> AppResult<Json<CropDetail>> {
    let today = state.config.advisory.today();
    let service = CropService::new(state.store);
    let detail = service.crop_detail(crop_id, today).await?;
    Ok(Json(detail))
}
