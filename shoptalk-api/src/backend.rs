//! Remote model backend.
//!
//! Provides a typed capability interface for the hosted LLM so that failure
//! is an explicit outcome the resolver can absorb, and so tests can inject a
//! deterministic fake.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use shoptalk_common::config::LlmConfig;
use std::time::Instant;

/// Capability to turn a composed prompt into assistant text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Invoke the remote model with a fully composed prompt.
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Error from a backend invocation.
#[derive(Debug, Clone)]
pub struct BackendError {
    pub backend: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.backend, self.message)
    }
}

impl std::error::Error for BackendError {}

/// NVIDIA NIM backend (OpenAI-compatible chat completions API).
pub struct NvidiaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: i64,
}

impl NvidiaBackend {
    /// Create a backend from LLM configuration. Returns `None` when no API
    /// key is configured, which puts the service into fallback-only mode.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref().filter(|k| !k.is_empty())?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Some(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatBackend for NvidiaBackend {
    fn name(&self) -> &str {
        "nvidia"
    }

    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![WireMessage {
                role: "user".into(),
                content: prompt.to_string(),
            }],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError {
                backend: "nvidia".into(),
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError {
                backend: "nvidia".into(),
                message: format!("API error: {}", body),
                status_code: Some(status.as_u16()),
            });
        }

        let completion: CompletionResponse =
            response.json().await.map_err(|e| BackendError {
                backend: "nvidia".into(),
                message: format!("Failed to parse response: {}", e),
                status_code: None,
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| BackendError {
                backend: "nvidia".into(),
                message: "Response contained no choices".into(),
                status_code: None,
            })?;

        tracing::debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Backend completion received"
        );

        Ok(content)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<i64>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
