//! Generation client: the one network call in the system.
//!
//! [`GenerationClient`] is the seam the rest of the crate talks to, so the
//! session can be driven by a stub in tests. [`GeminiClient`] is the real
//! implementation against Google's `generateContent` REST endpoint.
//!
//! Every failure mode (missing key, transport error, HTTP status, malformed
//! body, blocked prompt) collapses into
//! [`ItineraryError::GenerationFailed`]; the detail string is for logs only.
//!
//! The API key travels in the `x-goog-api-key` header and never in the URL,
//! and transport errors are stripped of their URL before they are wrapped,
//! so the key cannot end up in an error detail or a log line.

use crate::config::{GenerationConfig, SafetySetting};
use crate::error::ItineraryError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Header carrying the Gemini API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Raw model output for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub prompt_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: Option<String>,
}

/// Anything that can turn a prompt into itinerary text.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Generation, ItineraryError>;
}

/// Google Gemini over plain HTTPS.
#[derive(Debug, Clone, Default)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured `reqwest::Client` (proxies, custom TLS, …).
    pub fn with_http_client(client: Client) -> Self {
        Self { client }
    }

    /// Explicit key first, then the configured environment variable.
    fn api_key(config: &GenerationConfig) -> Result<String, ItineraryError> {
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }
        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ItineraryError::generation(format!(
                "{} is not set",
                config.api_key_env
            ))),
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Generation, ItineraryError> {
        let api_key = Self::api_key(config)?;
        let url = format!("{}/models/{}:generateContent", config.base_url, config.model);
        let body = GeminiRequest::new(prompt, config);

        debug!(
            model = %config.model,
            prompt_len = prompt.len(),
            safety_settings = body.safety_settings.len(),
            "Sending generateContent request"
        );

        let mut request = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key.as_str())
            .json(&body);
        if let Some(secs) = config.request_timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ItineraryError::generation(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ItineraryError::generation(format!("HTTP {status}: {text}")));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ItineraryError::generation(e.without_url()))?;

        parsed.into_generation()
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

impl GeminiRequest {
    fn new(prompt: &str, config: &GenerationConfig) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
            safety_settings: config.safety_settings.clone(),
        }
    }
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
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GeminiResponse {
    fn into_generation(self) -> Result<Generation, ItineraryError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ItineraryError::generation(format!("prompt blocked: {reason}")));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ItineraryError::generation("response had no candidates"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(ItineraryError::generation(format!(
                "empty response (finish reason: {reason})"
            )));
        }

        let usage = self.usage_metadata;
        Ok(Generation {
            text,
            prompt_tokens: usage.as_ref().and_then(|u| u.prompt_token_count).unwrap_or(0),
            output_tokens: usage.as_ref().and_then(|u| u.candidates_token_count).unwrap_or(0),
            finish_reason: candidate.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_shape() {
        let config = GenerationConfig::default();
        let body = serde_json::to_value(GeminiRequest::new("plan a trip", &config)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "plan a trip");
        let gen = &body["generationConfig"];
        assert_eq!(gen["topK"], 40);
        assert_eq!(gen["maxOutputTokens"], 2048);
        assert!((gen["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((gen["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_safety_settings_are_omitted() {
        let config = GenerationConfig::builder().without_safety_settings().build().unwrap();
        let body = serde_json::to_value(GeminiRequest::new("x", &config)).unwrap();
        assert!(body.get("safetySettings").is_none());
    }

    #[test]
    fn response_parts_are_concatenated() {
        let json = r###"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "# Day 1\n"}, {"text": "## Morning"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 800, "totalTokenCount": 920}
        }"###;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let gen = parsed.into_generation().unwrap();
        assert_eq!(gen.text, "# Day 1\n## Morning");
        assert_eq!(gen.prompt_tokens, 120);
        assert_eq!(gen.output_tokens, 800);
        assert_eq!(gen.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn blocked_prompt_is_a_generation_failure() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = parsed.into_generation().unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate itinerary");
        assert!(err.generation_detail().unwrap().contains("SAFETY"));
    }

    #[test]
    fn candidate_without_text_is_a_failure() {
        let json = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = parsed.into_generation().unwrap_err();
        assert!(err.generation_detail().unwrap().contains("MAX_TOKENS"));
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let config = GenerationConfig::builder()
            .api_key("explicit")
            .api_key_env("WANDERLENS_TEST_UNSET_KEY_VAR")
            .build()
            .unwrap();
        assert_eq!(GeminiClient::api_key(&config).unwrap(), "explicit");
    }

    #[tokio::test]
    async fn transport_error_does_not_carry_the_key() {
        let config = GenerationConfig::builder()
            .base_url("http://127.0.0.1:1")
            .api_key("SENTINEL-KEY-8c1f")
            .request_timeout_secs(5)
            .build()
            .unwrap();
        let err = GeminiClient::new().generate("p", &config).await.unwrap_err();
        let detail = err.generation_detail().unwrap();
        assert!(!detail.contains("SENTINEL-KEY-8c1f"), "key leaked: {detail}");
        assert!(!format!("{err:?}").contains("SENTINEL-KEY-8c1f"));
    }

    #[test]
    fn missing_key_is_a_generation_failure() {
        let config = GenerationConfig::builder()
            .api_key_env("WANDERLENS_TEST_UNSET_KEY_VAR")
            .build()
            .unwrap();
        let err = GeminiClient::api_key(&config).unwrap_err();
        assert!(err
            .generation_detail()
            .unwrap()
            .contains("WANDERLENS_TEST_UNSET_KEY_VAR"));
    }
}
