//! Exohunt Cloud
//!
//! HTTP service classifying transit candidates from the Kepler, K2 and TESS
//! catalogs as planets or false positives.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        EXOHUNT CLOUD                          │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────────────────────────────┐ │
//! │  │  API      │   │  Pipeline                                │ │
//! │  │  (Axum)   │──▶│  mission → features → scaling →          │ │
//! │  │           │   │  classifier → verdict                    │ │
//! │  └───────────┘   └───────────────────┬──────────────────────┘ │
//! │                                      ▼                        │
//! │                        ┌──────────────────────────┐           │
//! │                        │ Model registry (models/) │           │
//! │                        └──────────────────────────┘           │
//! └───────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::logic::model::SharedRegistry;

pub use error::{AppError, AppResult};

/// Room for multipart framing and the small text fields around the file
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "exohunt_cloud=debug,tower_http=debug".into());
    let subscriber = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Exohunt Cloud starting ({})...", config.environment);
    if !config.is_production() {
        tracing::debug!(?config, "Loaded configuration");
    }

    config
        .threshold()
        .context("DEFAULT_THRESHOLD must be within [0, 1]")?;

    // Load every model eagerly; a bad artifact aborts startup
    tracing::info!("Loading models from {}", config.models_dir.display());
    let registry = SharedRegistry::load(&config.models_dir)
        .with_context(|| format!("Failed to load models from {}", config.models_dir.display()))?;

    let snapshot = registry.snapshot();
    snapshot
        .lookup(&config.default_model)
        .context("DEFAULT_MODEL is not in the registry")?;
    tracing::info!("Registry ready: {} model(s) [{}]", snapshot.len(), snapshot.ids().join(", "));

    // Build application state
    let state = AppState {
        registry: Arc::new(registry),
        config: config.clone(),
        started_at: Instant::now(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SharedRegistry>,
    pub config: config::Config,
    pub started_at: Instant,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes() + FORM_OVERHEAD_BYTES;

    let routes = Router::new()
        // Inference
        .route("/predict", post(handlers::predict::predict))
        .route("/manual-predict", post(handlers::manual::predict))

        // Manual entry helpers
        .route("/parameter-ranges", get(handlers::manual::parameter_ranges))
        .route("/example-planets", get(handlers::manual::example_planets_list))

        // Models
        .route("/models", get(handlers::models::list))
        .route("/models/reload", post(handlers::models::reload))
        .route("/models/:id/metrics", get(handlers::models::metrics))
        .route("/models/:id/importance", get(handlers::models::importance))
        .route("/models/:id/statistics", get(handlers::models::statistics))

        .route("/health", get(handlers::health::check));

    // Same API at the root and under the UI's `/api` prefix
    Router::new()
        .route("/", get(handlers::health::root))
        .merge(routes.clone())
        .nest("/api", routes)
        .fallback(handlers::health::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
