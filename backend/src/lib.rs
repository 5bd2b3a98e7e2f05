//! Malawi Farm Advisory Platform - Backend
//!
//! Bilingual (English/Chichewa) crop advice for smallholder farmers, built
//! from each district's daily weather, the farming calendar and the crop's
//! agronomy.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use store::{AdvisoryStore, DynStore, MemoryStore, PgStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: DynStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Malawi Farm Advisory Platform API v1.0 / Malangizo a Ulimi"
}
