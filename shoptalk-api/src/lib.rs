//! Shoptalk API - chat assistant service for an e-commerce database.
//!
//! This crate provides the HTTP service:
//! - Per-session conversation transcripts held in memory
//! - Response resolution against a hosted LLM with rule-based fallback
//! - Session management endpoints
//!
//! ## Architecture
//!
//! ```text
//! Client → /chat → SessionStore (resolve/create, per-session lock)
//!                      ↓
//!                  Resolver → ChatBackend (remote model)
//!                      ↓ on failure/absence
//!                  fallback rule table
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod backend;
pub mod fallback;
pub mod prompt;
pub mod resolver;
pub mod routes;
pub mod session;

pub use backend::{BackendError, ChatBackend, NvidiaBackend};
pub use resolver::Resolver;
pub use routes::AppState;
pub use session::{Role, Session, SessionStore, Turn};

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use shoptalk_common::config::Config;

/// Build the application state from configuration.
pub fn build_state(config: &Config) -> AppState {
    let backend = NvidiaBackend::from_config(&config.llm)
        .map(|b| Arc::new(b) as Arc<dyn ChatBackend>);

    if backend.is_some() {
        tracing::info!(model = %config.llm.model, "Remote model backend configured");
    } else {
        tracing::warn!("No remote model backend configured, using fallback responses only");
    }

    AppState {
        sessions: Arc::new(SessionStore::new()),
        resolver: Arc::new(Resolver::new(backend)),
        database_configured: config.database.is_configured(),
    }
}

/// Build the service router with all routes and middleware.
pub fn build_router(config: &Config) -> Router {
    build_router_with_state(build_state(config))
}

/// Build the router from explicit state. Useful for tests that inject a
/// fake backend or a pre-populated session store.
pub fn build_router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::build_routes(state).layer(cors)
}

/// Start the service.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let router = build_router(config);

    tracing::info!("Starting Shoptalk API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
