//! Route definitions for the Shoptalk chat service.
//!
//! Provides HTTP endpoints for chat, session management, and health checks.

use crate::resolver::Resolver;
use crate::session::SessionStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use shoptalk_common::Error;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub resolver: Arc<Resolver>,
    pub database_configured: bool,
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub timestamp: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub llm_status: String,
    pub database_status: String,
    pub active_sessions: usize,
}

/// Active sessions listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub active_sessions: usize,
    pub session_ids: Vec<String>,
}

/// Confirmation message response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Service metadata returned from the root endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
    pub endpoints: ServiceEndpoints,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub chat: String,
    pub health: String,
    pub sessions: String,
}

/// Build the service router.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .route(
            "/sessions",
            get(list_sessions_handler).delete(clear_sessions_handler),
        )
        .route("/sessions/:id", delete(delete_session_handler))
        .with_state(state)
}

/// Map a service error onto the wire shape, using its status mapping.
fn error_response(err: &Error, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.into(),
        }),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Handler
// ─────────────────────────────────────────────────────────────────────────────

/// Main chat endpoint with conversation memory.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Reject empty input before touching the session store, so no session
    // or transcript mutation happens for invalid requests.
    if request.message.trim().is_empty() {
        return Err(error_response(
            &Error::InvalidInput("Message cannot be empty".into()),
            "CHAT_EMPTY_MESSAGE",
        ));
    }

    let (session_id, session) = state
        .sessions
        .resolve_or_create(request.session_id.as_deref())
        .await;

    // Hold the per-session lock across resolution so same-session calls
    // serialize and the read-append cycle stays atomic.
    let mut transcript = session.lock().await;
    let response = state
        .resolver
        .resolve(&mut transcript, &request.message)
        .await
        .map_err(|e| {
            if e.is_invalid_input() {
                error_response(&e, "CHAT_INVALID_INPUT")
            } else {
                // Surface anything unexpected generically, without leaking
                // internals to the caller.
                tracing::error!(error = %e, "Chat resolution failed");
                error_response(
                    &Error::Internal("Internal server error occurred".into()),
                    "CHAT_INTERNAL_ERROR",
                )
            }
        })?;

    Ok(Json(ChatResponse {
        response,
        session_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Get information about active chat sessions.
async fn list_sessions_handler(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        active_sessions: state.sessions.count().await,
        session_ids: state.sessions.list_ids().await,
    })
}

/// Clear a specific chat session.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    if state.sessions.delete(&id).await {
        tracing::info!(session_id = %id, "Session cleared");
        Ok(Json(MessageResponse {
            message: format!("Session {} cleared successfully", id),
        }))
    } else {
        Err(error_response(
            &Error::NotFound(format!("Session {}", id)),
            "SESSION_NOT_FOUND",
        ))
    }
}

/// Clear all chat sessions.
async fn clear_sessions_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    let cleared = state.sessions.clear_all().await;
    tracing::info!(cleared, "All sessions cleared");
    Json(MessageResponse {
        message: "All sessions cleared successfully".into(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Health Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed health check.
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        llm_status: if state.resolver.has_backend() {
            "connected".into()
        } else {
            "disconnected".into()
        },
        database_status: if state.database_configured {
            "connected".into()
        } else {
            "disconnected".into()
        },
        active_sessions: state.sessions.count().await,
    })
}

/// Service metadata.
async fn root_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Shoptalk AI Assistant".into(),
        status: "running".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        endpoints: ServiceEndpoints {
            chat: "/chat".into(),
            health: "/health".into(),
            sessions: "/sessions".into(),
        },
    })
}
