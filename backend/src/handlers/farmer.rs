//! HTTP handlers for the farmer's own profile

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::farmer::{FarmerView, LanguageInput, ProfileInput};
use crate::services::FarmerService;
use crate::AppState;
use shared::Language;

#[derive(Serialize)]
pub struct LanguageResponse {
    pub language: Language,
    pub label: &'static str,
}

/// Get the current farmer's profile
pub async fn get_my_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<FarmerView>> {
    let service = FarmerService::new(state.store);
    let profile = service.get_profile(current_user.0.user_id).await?;
    Ok(Json(profile))
}

/// Create or replace the current farmer's profile
pub async fn update_my_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<FarmerView>> {
    let service = FarmerService::new(state.store);
    let profile = service.save_profile(current_user.0.user_id, input).await?;
    Ok(Json(profile))
}

/// Set the preferred language
pub async fn set_language(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<LanguageInput>,
) -> AppResult<Json<LanguageResponse>> {
    let service = FarmerService::new(state.store);
    let language = service
        .set_language(current_user.0.user_id, &input.language)
        .await?;
    Ok(Json(LanguageResponse {
        language,
        label: language.label(),
    }))
}
