//! HTTP handlers for crop advice

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::advisory::{AdviceOptions, AdviceView, GenerateAdviceInput};
use crate::services::AdvisoryService;
use crate::AppState;

/// Generate advice for one crop
pub async fn generate_advice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<GenerateAdviceInput>,
) -> AppResult<(StatusCode, Json<AdviceView>)> {
    let today = state.config.advisory.today();
    let service = AdvisoryService::new(state.store.clone(), &state.config);
    let advice = service
        .generate_advice(
            current_user.0.user_id,
            input.crop_id,
            input.advice_type.as_deref().unwrap_or_default(),
            today,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(advice)))
}

/// All advice for the current farmer, newest first
pub async fn advice_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<AdviceView>>> {
    let service = AdvisoryService::new(state.store.clone(), &state.config);
    let history = service.history(current_user.0.user_id).await?;
    Ok(Json(history))
}

/// Crops and advice types the farmer can ask about
pub async fn advice_options(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AdviceOptions>> {
    let service = AdvisoryService::new(state.store.clone(), &state.config);
    let options = service.options(current_user.0.user_id).await?;
    Ok(Json(options))
}
