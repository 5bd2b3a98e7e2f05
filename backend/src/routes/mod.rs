//! Route definitions for the Malawi Farm Advisory Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health and stats (public)
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Reference data (public)
        .route("/regions", get(handlers::list_regions))
        .nest("/crops", crop_routes())
        .route("/calendar", get(handlers::get_calendar))
        .nest("/weather", weather_routes())
        // Market prices: feed is public, recording is protected
        .nest("/prices", price_routes(state.clone()))
        // Protected routes - farmer profile
        .nest("/farmers", farmer_routes(state.clone()))
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes(state.clone()))
        // Protected routes - advice
        .nest("/advice", advice_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

/// Crop catalogue routes (public)
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops))
        .route("/:crop_id", get(handlers::get_crop))
}

/// Weather routes (public)
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_weather))
        .route("/:region_id", get(handlers::get_weather_history))
        .route("/:region_id/today", get(handlers::get_today_weather))
}

/// Market price routes
fn price_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(handlers::record_price))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/:crop_id", get(handlers::get_price_history))
        .merge(protected)
}

/// Farmer profile routes (protected)
fn farmer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(handlers::get_my_profile).put(handlers::update_my_profile),
        )
        .route("/me/language", put(handlers::set_language))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Advice routes (protected)
fn advice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::generate_advice))
        .route("/options", get(handlers::advice_options))
        .route("/history", get(handlers::advice_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
