//! Model invocation with ordered fallback across model identifiers.
//!
//! The active identifier (sticky preference from the last successful call) is
//! tried first, then the fixed fallback sequence. Only not-found errors
//! advance the loop; anything else (auth, rate limit, network) aborts
//! immediately so transient failures are never masked by extra attempts.

use thiserror::Error;
use tracing::warn;

use crate::credentials::CredentialStore;
use crate::llm_client::{BackendError, ChatBackend, ChatMessage, FALLBACK_MODELS};

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Gemini API error: model not available.")]
    Exhausted,

    #[error("{0}")]
    Backend(#[from] BackendError),
}

/// Tries each candidate model in order and returns the first successful
/// response text. On success the winning identifier becomes the new sticky
/// preference, so later turns skip known-dead candidates.
pub async fn invoke(
    backend: &dyn ChatBackend,
    credentials: &CredentialStore,
    system_prompt: &str,
    messages: &[ChatMessage],
) -> Result<String, InvokeError> {
    let api_key = credentials.api_key();
    let candidates = candidate_models(&credentials.active_model());

    for model in &candidates {
        match backend.generate(&api_key, model, system_prompt, messages).await {
            Ok(text) => {
                credentials.set_active_model(model.clone());
                return Ok(text);
            }
            Err(e) if e.is_model_not_found() => {
                warn!("model {model} unavailable, trying next candidate: {e}");
                continue;
            }
            Err(e) => return Err(InvokeError::Backend(e)),
        }
    }

    Err(InvokeError::Exhausted)
}

/// Active identifier first, then the fixed fallbacks, de-duplicated while
/// preserving order.
fn candidate_models(active: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(FALLBACK_MODELS.len() + 1);
    if !active.is_empty() {
        candidates.push(active.to_string());
    }
    for model in FALLBACK_MODELS {
        if !candidates.iter().any(|c| c == model) {
            candidates.push(model.to_string());
        }
    }
    candidates
}
