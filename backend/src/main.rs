//! Malawi Farm Advisory Platform - Backend Server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mfa_backend::config::{Config, LoggingConfig, StoreBackend};
use mfa_backend::services::SeedService;
use mfa_backend::{create_app, AppState, DynStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    init_tracing(&config.logging);

    tracing::info!("Starting Malawi Farm Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    let store = connect_store(&config).await?;

    if config.seed.on_startup {
        tracing::info!("Seeding reference data...");
        SeedService::new(store.clone(), config.seed.weather_history_days)
            .run(config.advisory.today())
            .await?;
    }

    // Create application state
    let port = config.server.port;
    let state = AppState::new(store, config);

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mfa_server=debug,mfa_backend=debug,tower_http=debug,sqlx=warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_store(config: &Config) -> anyhow::Result<DynStore> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            // Create database connection pool
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&config.database.url)
                .await?;

            tracing::info!("Database connection established");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&db_pool).await?;
            tracing::info!("Migrations completed");

            Ok(Arc::new(PgStore::new(db_pool)))
        }
    }
}
