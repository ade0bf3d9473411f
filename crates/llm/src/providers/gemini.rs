//! Google Gemini LLM provider implementation.
//!
//! Uses the `generateContent` REST endpoint.
//! Gemini API: https://ai.google.dev/api/generate-content

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use faq_core::{AppError, AppResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_VERSION: &str = "v1beta";
const MODEL_PREFIX: &str = "models/";

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

impl GeminiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Normalize a model identifier to the `models/<name>` form.
pub fn model_path(model: &str) -> String {
    if model.starts_with(MODEL_PREFIX) {
        model.to_string()
    } else {
        format!("{}{}", MODEL_PREFIX, model)
    }
}

/// Gemini LLM client.
pub struct GeminiClient {
    /// Base URL for the Gemini API
    base_url: String,

    /// API key, resolved once at start-up
    api_key: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a new Gemini client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.base_url,
            API_VERSION,
            model_path(model)
        )
    }

    /// Convert LlmRequest to Gemini format.
    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart::text(request.prompt.clone())],
            }],
            generation_config,
        }
    }

    /// Convert Gemini response to LlmResponse.
    fn convert_response(
        &self,
        request: &LlmRequest,
        response: GeminiResponse,
    ) -> AppResult<LlmResponse> {
        let candidate = match response.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = response
                    .prompt_feedback
                    .and_then(|feedback| feedback.block_reason)
                    .unwrap_or_else(|| "no candidates returned".to_string());
                return Err(AppError::Llm(format!(
                    "Gemini returned no answer: {}",
                    reason
                )));
            }
        };

        let content: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text)
            .collect();

        if content.is_empty() {
            return Err(AppError::Llm(format!(
                "Gemini returned an empty answer (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = response
            .usage_metadata
            .map(|meta| {
                let prompt = meta.prompt_token_count.unwrap_or(0);
                let completion = meta.candidates_token_count.unwrap_or(0);
                let mut usage = LlmUsage::new(prompt, completion);
                if let Some(total) = meta.total_token_count {
                    usage.total_tokens = total;
                }
                usage
            })
            .unwrap_or_default();

        let done = !matches!(candidate.finish_reason.as_deref(), Some("MAX_TOKENS"));

        Ok(LlmResponse {
            content,
            model: response
                .model_version
                .unwrap_or_else(|| model_path(&request.model)),
            usage,
            done,
        })
    }
}

/// Describe a non-success HTTP status from the Gemini API.
fn describe_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication failed",
        StatusCode::TOO_MANY_REQUESTS => "quota or rate limit exceeded",
        StatusCode::BAD_REQUEST => "malformed request",
        StatusCode::NOT_FOUND => "model not found",
        _ => "request failed",
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini ({})", request.model);
        tracing::debug!("Prompt length: {} chars", request.prompt.len());

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Llm("Gemini authentication failed: no API key configured".to_string())
        })?;

        let gemini_request = self.to_gemini_request(request);
        let url = self.generate_url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Gemini API error ({}, {}): {}",
                status,
                describe_status(status),
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        tracing::info!("Received completion from Gemini");
        tracing::debug!("Response: {:?}", gemini_response);

        self.convert_response(request, gemini_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> GeminiResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_model_path() {
        assert_eq!(model_path("gemini-2.5-flash"), "models/gemini-2.5-flash");
        assert_eq!(model_path("models/gemini-2.5-flash"), "models/gemini-2.5-flash");
    }

    #[test]
    fn test_generate_url() {
        let client = GeminiClient::with_base_url("http://localhost:8080/", None);
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(
            client.generate_url("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_conversion() {
        let client = GeminiClient::new(Some("key".to_string()));
        let request = LlmRequest::new("Hello", DEFAULT_MODEL);

        let body = serde_json::to_value(client.to_gemini_request(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }]
            })
        );
    }

    #[test]
    fn test_request_conversion_with_options() {
        let client = GeminiClient::new(None);
        let request = LlmRequest::new("Hello", DEFAULT_MODEL)
            .with_max_tokens(64);

        let body = serde_json::to_value(client.to_gemini_request(&request)).unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_convert_response() {
        let client = GeminiClient::new(None);
        let request = LlmRequest::new("q", DEFAULT_MODEL);
        let response = parse(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Use " }, { "text": "docker compose." }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 40, "candidatesTokenCount": 5, "totalTokenCount": 52 },
            "modelVersion": "gemini-2.5-flash"
        }));

        let converted = client.convert_response(&request, response).unwrap();
        assert_eq!(converted.content, "Use docker compose.");
        assert_eq!(converted.model, "gemini-2.5-flash");
        assert_eq!(converted.usage.prompt_tokens, 40);
        assert_eq!(converted.usage.completion_tokens, 5);
        assert_eq!(converted.usage.total_tokens, 52);
        assert!(converted.done);
    }

    #[test]
    fn test_convert_response_skips_thoughts() {
        let client = GeminiClient::new(None);
        let request = LlmRequest::new("q", DEFAULT_MODEL);
        let response = parse(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "thinking...", "thought": true }, { "text": "NONE" }] },
                "finishReason": "MAX_TOKENS"
            }]
        }));

        let converted = client.convert_response(&request, response).unwrap();
        assert_eq!(converted.content, "NONE");
        assert_eq!(converted.model, "models/gemini-2.5-flash");
        assert!(!converted.done);
    }

    #[test]
    fn test_convert_blocked_prompt() {
        let client = GeminiClient::new(None);
        let request = LlmRequest::new("q", DEFAULT_MODEL);
        let response = parse(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }));

        match client.convert_response(&request, response) {
            Err(AppError::Llm(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("Expected LLM error, got {:?}", other),
        }
    }

    #[test]
    fn test_describe_status() {
        assert_eq!(describe_status(StatusCode::FORBIDDEN), "authentication failed");
        assert_eq!(
            describe_status(StatusCode::TOO_MANY_REQUESTS),
            "quota or rate limit exceeded"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let client = GeminiClient::with_base_url("http://127.0.0.1:9", None);
        let result = client.complete(&LlmRequest::new("q", DEFAULT_MODEL)).await;

        match result {
            Err(AppError::Llm(msg)) => assert!(msg.contains("no API key")),
            other => panic!("Expected LLM error, got {:?}", other),
        }
    }
}
