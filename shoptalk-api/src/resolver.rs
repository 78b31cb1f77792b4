//! Response resolution.
//!
//! Decides how to answer a user message: ask the remote backend when one is
//! configured, fall back to the keyword rule table when it is absent or
//! fails, and append the resulting turn pair to the transcript. Backend
//! failure is absorbed here; chat callers only ever see a successful,
//! possibly degraded, reply.

use crate::backend::ChatBackend;
use crate::fallback;
use crate::prompt;
use crate::session::Turn;
use shoptalk_common::{Error, Result};
use std::sync::Arc;

pub struct Resolver {
    backend: Option<Arc<dyn ChatBackend>>,
}

impl Resolver {
    pub fn new(backend: Option<Arc<dyn ChatBackend>>) -> Self {
        Self { backend }
    }

    /// Whether a remote backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Resolve one chat call against a locked transcript.
    ///
    /// Validates the message, produces the assistant text, appends the
    /// user/assistant turn pair in order, and returns the assistant text.
    /// Fails only on invalid input, before any transcript mutation.
    pub async fn resolve(&self, transcript: &mut Vec<Turn>, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidInput("Message cannot be empty".into()));
        }

        let reply = match &self.backend {
            Some(backend) => {
                let composed = prompt::compose(transcript, message);
                match backend.invoke(&composed).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(
                            backend = backend.name(),
                            error = %e,
                            "Backend call failed, degrading to fallback response"
                        );
                        fallback::select(message).to_string()
                    }
                }
            }
            None => fallback::select(message).to_string(),
        };

        transcript.push(Turn::user(message));
        transcript.push(Turn::assistant(reply.clone()));

        Ok(reply)
    }
}
