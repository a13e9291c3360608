/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through this module.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod invoker;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Preferred model when no override is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Known-good identifiers tried in order after the active preference.
/// Identifiers are occasionally deprecated or renamed upstream; the list
/// trades one extra attempt for resilience.
pub const FALLBACK_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"];

const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.9;
const MAX_OUTPUT_TOKENS: u32 = 800;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Role of a normalized conversation message in the chat wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// A single normalized conversation turn, ready for invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model {model} not found: {message}")]
    ModelNotFound { model: String, message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

impl BackendError {
    /// True when the error means the model identifier itself is invalid, so
    /// the caller may advance to the next candidate. The structured
    /// `ModelNotFound` kind is authoritative; the message inspection below is
    /// a compatibility shim for backends that only surface text.
    pub fn is_model_not_found(&self) -> bool {
        match self {
            BackendError::ModelNotFound { .. } => true,
            BackendError::Api { status, message } => {
                *status == 404
                    || message.contains("404")
                    || message.contains("NOT_FOUND")
                    || message.to_lowercase().contains("not found")
            }
            _ => false,
        }
    }
}

/// The chat-completion backend seam. `AppState` carries an
/// `Arc<dyn ChatBackend>` so the invoker and handlers never depend on a
/// concrete provider; tests inject mocks here.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Performs one chat-completion call: a system instruction plus the
    /// normalized history, with fixed sampling parameters. Returns the
    /// concatenated, whitespace-trimmed response text.
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<String, BackendError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent request/response)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini client
// ────────────────────────────────────────────────────────────────────────────

/// Reqwest-backed Gemini client. Holds no credential: the key is read from
/// the credential store per turn and passed in, since an admin may swap it at
/// any time.
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<String, BackendError> {
        let request_body = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part { text: system_prompt }],
            },
            contents: messages
                .iter()
                .map(|m| Content {
                    role: m.role.as_str(),
                    parts: vec![Part { text: &m.text }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let response = self
            .client
            .post(&url)
            // The key travels in a header so it never appears in URLs or logs.
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, api_status) = match serde_json::from_str::<GeminiErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.error.message, envelope.error.status),
                Err(_) => (body, String::new()),
            };

            if status.as_u16() == 404 || api_status == "NOT_FOUND" {
                return Err(BackendError::ModelNotFound {
                    model: model.to_string(),
                    message,
                });
            }
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "gemini call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        extract_text(&parsed).ok_or(BackendError::EmptyContent)
    }
}

/// Concatenates the text parts of the first candidate, trimmed of surrounding
/// whitespace. Returns `None` when the response carries no usable text.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case_wire_names() {
        let request = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part { text: "system" }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["topP"], 0.9);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 800);
    }

    #[test]
    fn test_extract_text_concatenates_and_trims_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "  Hello"}, {"text": " world.  "}]}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).unwrap(), "Hello world.");
    }

    #[test]
    fn test_extract_text_empty_candidates_is_none() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_extract_text_whitespace_only_is_none() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#,
        )
        .unwrap();
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn test_structured_not_found_is_model_not_found() {
        let err = BackendError::ModelNotFound {
            model: "gemini-1.0-pro".to_string(),
            message: "Publisher Model was not found".to_string(),
        };
        assert!(err.is_model_not_found());
    }

    #[test]
    fn test_api_404_status_is_model_not_found() {
        let err = BackendError::Api {
            status: 404,
            message: "no such model".to_string(),
        };
        assert!(err.is_model_not_found());
    }

    #[test]
    fn test_text_shim_matches_not_found_message() {
        let err = BackendError::Api {
            status: 400,
            message: "models/gemini-x is NOT_FOUND for API version v1beta".to_string(),
        };
        assert!(err.is_model_not_found());

        let err = BackendError::Api {
            status: 400,
            message: "Model not found or access denied".to_string(),
        };
        assert!(err.is_model_not_found());
    }

    #[test]
    fn test_rate_limit_is_not_model_not_found() {
        let err = BackendError::Api {
            status: 429,
            message: "Resource has been exhausted".to_string(),
        };
        assert!(!err.is_model_not_found());
    }

    #[test]
    fn test_empty_content_is_not_model_not_found() {
        assert!(!BackendError::EmptyContent.is_model_not_found());
    }
}
