//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::services::auth::{AuthTokens, LoginInput, RegisterInput, RegisterResponse};
use crate::services::AuthService;
use crate::AppState;

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> AppResult<Json<AuthTokens>> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let tokens = auth_service.login(body).await?;
    Ok(Json(tokens))
}

/// Register farmer endpoint handler
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let response = auth_service.register(body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
