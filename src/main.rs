//! openaid backend
//!
//! Search, filter and export aid activities served by a remote IATI API,
//! with country border reference data kept in SQLite.

mod api;
mod cache;
mod config;
mod db;
mod errors;
mod gateway;
mod geo;
mod models;
mod presentation;
mod search;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cache::{SnapshotCache, SystemClock};
use config::Config;
use db::BorderRepository;
use gateway::{Gateway, HttpDataSource};
use search::SearchService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub borders: Arc<BorderRepository>,
    pub search: Arc<SearchService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the services around a remote data source.
    pub fn new(
        config: Config,
        source: Arc<dyn gateway::DataSource>,
        borders: Arc<BorderRepository>,
    ) -> Self {
        let cache = Arc::new(SnapshotCache::new(
            config.cache_ttl_secs,
            Arc::new(SystemClock),
        ));
        let gateway = Arc::new(Gateway::new(source, cache));
        let search = Arc::new(SearchService::new(
            gateway.clone(),
            borders.clone(),
            config.currency(),
        ));

        Self {
            gateway,
            borders,
            search,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting openaid backend");
    tracing::info!("Remote API: {}", config.api_url);
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let borders = Arc::new(BorderRepository::new(pool));

    // Load country borders
    if let Some(csv_path) = &config.borders_csv {
        borders.import_csv(csv_path).await?;
    } else if borders.count().await? == 0 {
        let seeded = borders.seed_reference_data().await?;
        tracing::warn!(
            "No border dataset configured (OPENAID_BORDERS_CSV); seeded {} countries without geometry",
            seeded
        );
    }

    let source = Arc::new(HttpDataSource::new(&config.api_url)?);
    let state = AppState::new(config.clone(), source, borders);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/activities", get(api::list_activities))
        .route("/projects/{id}", get(api::get_project))
        .route("/projects/{id}/csv", get(api::get_project_csv))
        .route("/map", get(api::list_borders));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod testing;

#[cfg(test)]
mod tests;
