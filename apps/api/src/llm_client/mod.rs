/// LLM Client — the single point of entry for all Gemini calls in Saanvi.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Callers hold an `Arc<dyn GuidanceModel>` built once in `main`, so tests can
/// swap in a scripted double without touching globals.
///
/// Model: gemini-3-flash-preview (hardcoded, not configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod mock;
pub mod prompts;
pub mod retry;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all guidance calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-3-flash-preview";
const RESPONSE_MIME_TYPE: &str = "application/json";

/// Typed failure classification, computed once at the call boundary.
/// Nothing downstream inspects error strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    #[error("Rate limited (status {status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("Authentication failed (status {status}): {message}")]
    AuthFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl LlmError {
    /// Only quota / rate-limit failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}

/// A fully assembled guidance call: instruction, user turn and output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidanceRequest {
    pub system_instruction: String,
    pub contents: String,
    pub response_schema: Value,
}

/// The remote capability the guidance pipeline depends on.
///
/// Returns the raw text the model produced; parsing and normalization happen
/// in `guidance::normalizer`.
#[async_trait]
pub trait GuidanceModel: Send + Sync {
    async fn invoke(&self, request: &GuidanceRequest) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Maps a non-success HTTP response onto `LlmError`.
///
/// Gemini reports quota exhaustion as 429 and/or `RESOURCE_EXHAUSTED` in the body.
pub fn classify_failure(status: u16, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<GeminiError>(body).ok();
    let (code, message, api_status) = match parsed {
        Some(e) => (e.error.code, e.error.message, e.error.status),
        None => (0, body.to_string(), String::new()),
    };

    if status == 429 || code == 429 || api_status == "RESOURCE_EXHAUSTED" {
        return LlmError::RateLimited {
            status: 429,
            message,
        };
    }

    match status {
        401 | 403 => LlmError::AuthFailed { status, message },
        500..=599 => LlmError::Network(format!("upstream returned {status}: {message}")),
        _ => LlmError::Schema(format!("request rejected with {status}: {message}")),
    }
}

/// Gemini `generateContent` client. One attempt per `invoke`; retry lives in `retry`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl GuidanceModel for GeminiClient {
    async fn invoke(&self, request: &GuidanceRequest) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart {
                    text: &request.contents,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE,
                response_schema: &request.response_schema,
            },
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, text);
            return Err(classify_failure(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Schema(format!("unreadable response envelope: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed
            .text()
            .ok_or_else(|| LlmError::Schema("response contained no candidate text".to_string()))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
