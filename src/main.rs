//! Tanda Backend
//!
//! A REST backend for organizing a recurring gift-pool ("tanda") among
//! friends, with SQLite persistence.

mod api;
mod auth;
mod config;
mod dates;
mod db;
mod engine;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tanda Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the passphrase is not configured
    if config.api_passphrase.is_none() {
        tracing::warn!("No API passphrase configured (TANDA_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

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

    // Clone the passphrase for the auth layer
    let passphrase = state.config.api_passphrase.clone();

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Participants
        .route("/participants", get(api::list_participants))
        .route("/participants", post(api::create_participant))
        .route("/participants/{id}", get(api::get_participant))
        .route("/participants/{id}", put(api::update_participant))
        .route("/participants/{id}", delete(api::delete_participant))
        .route("/participants/{id}/reminder-link", get(api::reminder_link))
        // Calendar
        .route("/calendar", get(api::list_calendar))
        .route("/calendar/years", get(api::list_years))
        .route("/calendar/generate", post(api::generate_calendar))
        .route("/calendar/turns/{id}", get(api::get_turn))
        .route("/calendar/turns/{id}", put(api::update_turn))
        .route("/calendar/turns/{id}/payments", put(api::record_payment))
        // History
        .route("/summary/{year}", get(api::get_summary))
        // Apply the shared-passphrase middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::passphrase_layer(passphrase.clone(), req, next)
        }));

    // Health check (no auth required)
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
