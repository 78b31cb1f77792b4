//! Integration tests for the Shoptalk API.
//!
//! Drives the full HTTP surface through the router: chat with and without a
//! backend, session lifecycle, and health checks.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use shoptalk_api::{
    backend::{BackendError, ChatBackend},
    build_router_with_state, fallback, AppState, Resolver, SessionStore,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Backend that always answers with a fixed string.
struct StaticBackend(&'static str);

#[async_trait]
impl ChatBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, BackendError> {
        Ok(self.0.to_string())
    }
}

/// Backend that always fails, simulating a remote outage.
struct OutageBackend;

#[async_trait]
impl ChatBackend for OutageBackend {
    fn name(&self) -> &str {
        "outage"
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(BackendError {
            backend: "outage".into(),
            message: "connection refused".into(),
            status_code: None,
        })
    }
}

/// Test helper building state with an injectable backend, returning the
/// session store handle for direct inspection.
fn create_test_state(backend: Option<Arc<dyn ChatBackend>>) -> (AppState, Arc<SessionStore>) {
    let sessions = Arc::new(SessionStore::new());
    let state = AppState {
        sessions: Arc::clone(&sessions),
        resolver: Arc::new(Resolver::new(backend)),
        database_configured: false,
    };
    (state, sessions)
}

/// Helper to make a request and get the status plus JSON response.
async fn request_json(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);

    let request = if let Some(b) = body {
        request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        request.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();

    (status, value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Health and Metadata Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_without_backend() {
    let (state, _) = create_test_state(None);
    let app = build_router_with_state(state);

    let (status, body) = request_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["llm_status"], "disconnected");
    assert_eq!(body["database_status"], "disconnected");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_health_with_backend() {
    let (state, _) = create_test_state(Some(Arc::new(StaticBackend("ok"))));
    let app = build_router_with_state(state);

    let (status, body) = request_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["llm_status"], "connected");
}

#[tokio::test]
async fn test_root_metadata() {
    let (state, _) = create_test_state(None);
    let app = build_router_with_state(state);

    let (status, body) = request_json(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"]["chat"], "/chat");
    assert!(body["version"].as_str().is_some());
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_chat_generates_session_id() {
    let (state, sessions) = create_test_state(None);
    let app = build_router_with_state(state);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/chat",
        Some(json!({"message": "Hello there"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let session_id = body["session_id"].as_str().unwrap();
    assert!(!session_id.is_empty());
    assert!(body["timestamp"].as_str().unwrap().contains('T'));

    // Fallback greeting, since no backend is configured.
    assert_eq!(body["response"], fallback::select("Hello there"));
    assert_eq!(sessions.count().await, 1);
}

#[tokio::test]
async fn test_chat_reuses_session_and_grows_transcript() {
    let (state, sessions) = create_test_state(Some(Arc::new(StaticBackend("the reply"))));
    let app = build_router_with_state(state);

    for n in 1..=3 {
        let (status, body) = request_json(
            &app,
            Method::POST,
            "/chat",
            Some(json!({"message": "Show me products", "session_id": "s1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "s1");
        assert_eq!(body["response"], "the reply");

        let session = sessions.get("s1").await.unwrap();
        assert_eq!(session.len().await, 2 * n);
    }

    assert_eq!(sessions.count().await, 1);
}

#[tokio::test]
async fn test_chat_empty_message_is_rejected() {
    let (state, sessions) = create_test_state(None);
    let app = build_router_with_state(state);

    for message in ["", "   ", "\n\t "] {
        let (status, body) = request_json(
            &app,
            Method::POST,
            "/chat",
            Some(json!({"message": message, "session_id": "s1"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CHAT_EMPTY_MESSAGE");
        assert_eq!(body["error"], "Invalid input: Message cannot be empty");
    }

    // Rejected before any session or transcript mutation.
    assert_eq!(sessions.count().await, 0);
}

#[tokio::test]
async fn test_chat_fallback_categories_are_deterministic() {
    let (state, _) = create_test_state(None);
    let app = build_router_with_state(state);

    let cases = [
        ("Hello there", "greeting"),
        ("Show me products", "product"),
        ("total revenue this quarter", "sales"),
        ("explain the schema", "schema"),
    ];

    for (message, _category) in cases {
        let expected = fallback::select(message);
        for _ in 0..3 {
            let (status, body) = request_json(
                &app,
                Method::POST,
                "/chat",
                Some(json!({"message": message})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["response"], expected);
        }
    }

    // Unmatched input gets the default courteous response.
    let (_, body) = request_json(
        &app,
        Method::POST,
        "/chat",
        Some(json!({"message": "asdkjalsd"})),
    )
    .await;
    assert_eq!(body["response"], fallback::DEFAULT_RESPONSE);
}

#[tokio::test]
async fn test_chat_survives_backend_outage() {
    let (state, sessions) = create_test_state(Some(Arc::new(OutageBackend)));
    let app = build_router_with_state(state);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/chat",
        Some(json!({"message": "Show me products", "session_id": "s1"})),
    )
    .await;

    // Degraded but successful: fallback text, valid session, appended pair.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], fallback::select("Show me products"));
    assert_eq!(body["session_id"], "s1");

    let session = sessions.get("s1").await.unwrap();
    assert_eq!(session.len().await, 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Management Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sessions() {
    let (state, sessions) = create_test_state(None);
    let app = build_router_with_state(state);

    sessions.resolve_or_create(Some("a")).await;
    sessions.resolve_or_create(Some("b")).await;

    let (status, body) = request_json(&app, Method::GET, "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active_sessions"], 2);

    let mut ids: Vec<&str> = body["session_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_delete_session() {
    let (state, sessions) = create_test_state(None);
    let app = build_router_with_state(state);

    sessions.resolve_or_create(Some("gone")).await;

    let (status, body) = request_json(&app, Method::DELETE, "/sessions/gone", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("gone"));

    // Subsequent listing excludes it.
    let (_, body) = request_json(&app, Method::GET, "/sessions", None).await;
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_delete_unknown_session_is_404() {
    let (state, _) = create_test_state(None);
    let app = build_router_with_state(state);

    let (status, body) = request_json(&app, Method::DELETE, "/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
    assert_eq!(body["error"], "Not found: Session nope");
}

#[tokio::test]
async fn test_clear_all_sessions() {
    let (state, sessions) = create_test_state(None);
    let app = build_router_with_state(state);

    for id in ["a", "b", "c"] {
        sessions.resolve_or_create(Some(id)).await;
    }

    let (status, body) = request_json(&app, Method::DELETE, "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All sessions cleared successfully");
    assert_eq!(sessions.count().await, 0);

    // Clearing an already-empty store is still a success.
    let (status, _) = request_json(&app, Method::DELETE, "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
}
