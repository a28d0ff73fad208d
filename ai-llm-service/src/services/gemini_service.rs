//! Gemini service for conversational text generation.
//!
//! Minimal, non-streaming client around the Gemini REST API:
//! - POST {endpoint}/v1beta/models/{model}:generateContent
//!
//! Constructor validation:
//! - `cfg.endpoint` must start with http:// or https://
//! - `cfg.api_key` must be usable as a header value
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::{
    future::Future,
    pin::Pin,
    time::{Duration, Instant},
};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    chat_content::Content,
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, HttpError, ProviderError, make_snippet},
    generator::ReplyGenerator,
};

/// Thin client for the Gemini API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    timeout: Duration,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`ProviderError::InvalidApiKey`] if the key is not a valid header value
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut key = header::HeaderValue::from_str(&cfg.api_key)
            .map_err(|_| ProviderError::InvalidApiKey)?;
        key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", key);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_generate = generate_url(endpoint, &cfg.model);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
            timeout,
        })
    }

    /// Performs a **non-streaming** `generateContent` request.
    ///
    /// Mapped options from config: `temperature`, `topP`, `maxOutputTokens`.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] / [`AiLlmError::Timeout`] for client/network failures
    /// - [`ProviderError::Decode`] if the JSON cannot be parsed
    /// - [`ProviderError::EmptyCandidates`] / [`ProviderError::EmptyText`] if no reply text came back
    pub async fn generate(&self, contents: &[Content]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, contents);

        debug!(
            model = %self.cfg.model,
            turns = contents.len(),
            "POST {}", self.url_generate
        );

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(ProviderError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let out: GenerateContentResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode generateContent response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts[].text`"
                ))
                .into());
            }
        };

        let reply = extract_reply(out)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            reply_len = reply.len(),
            "generateContent completed"
        );

        Ok(reply)
    }
}

impl ReplyGenerator for GeminiService {
    fn generate<'a>(
        &'a self,
        contents: &'a [Content],
    ) -> Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>> {
        Box::pin(GeminiService::generate(self, contents))
    }
}

/// `{endpoint}/v1beta/models/{model}:generateContent`, tolerating a
/// `models/` prefix on the model id.
fn generate_url(endpoint: &str, model: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    let model = model.trim().trim_start_matches("models/");
    format!("{base}/v1beta/models/{model}:generateContent")
}

/// Pulls the reply text out of a decoded response.
///
/// Concatenates the text parts of the first candidate and trims the result.
fn extract_reply(out: GenerateContentResponse) -> Result<String, ProviderError> {
    let Some(first) = out.candidates.into_iter().next() else {
        let reason = out.prompt_feedback.and_then(|f| f.block_reason);
        return Err(ProviderError::EmptyCandidates(reason));
    };

    let text: String = first
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();

    if text.is_empty() {
        return Err(ProviderError::EmptyText(
            first.finish_reason.unwrap_or_else(|| "unknown".into()),
        ));
    }
    Ok(text.to_string())
}

/* ===========================================================================
HTTP payloads & options
======================================================================== */

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, contents: &'a [Content]) -> Self {
        let gen_cfg = GenerationConfig {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_output_tokens: cfg.max_tokens,
        };
        Self {
            contents,
            generation_config: (!gen_cfg.is_empty()).then_some(gen_cfg),
        }
    }
}

/// Subset of Gemini `generationConfig`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.max_output_tokens.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_content::ContentRole;
    use serde_json::json;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: "gemini-1.5-flash".into(),
            endpoint: endpoint.into(),
            api_key: "test-key".into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(2),
        }
    }

    #[test]
    fn url_is_built_from_endpoint_and_model() {
        assert_eq!(
            generate_url("https://example.com/", "models/gemini-1.5-flash"),
            "https://example.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn request_omits_generation_config_when_unset() {
        let contents = vec![Content::text(ContentRole::User, "hi")];
        let c = cfg("https://example.com");
        let body = GenerateContentRequest::from_cfg(&c, &contents);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }] })
        );
    }

    #[test]
    fn request_maps_generation_knobs() {
        let contents = vec![Content::text(ContentRole::User, "hi")];
        let mut c = cfg("https://example.com");
        c.temperature = Some(0.5);
        c.max_tokens = Some(256);
        let v = serde_json::to_value(GenerateContentRequest::from_cfg(&c, &contents)).unwrap();
        assert_eq!(v["generationConfig"]["temperature"], json!(0.5));
        assert_eq!(v["generationConfig"]["maxOutputTokens"], json!(256));
        assert!(v["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn reply_joins_parts_and_trims() {
        let out: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "  Hello " }, { "text": "world.\n" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_reply(out).unwrap(), "Hello world.");
    }

    #[test]
    fn blocked_prompt_has_no_candidates() {
        let out: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        match extract_reply(out) {
            Err(ProviderError::EmptyCandidates(Some(r))) => assert_eq!(r, "SAFETY"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn candidate_without_text_is_an_error() {
        let out: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();
        assert!(matches!(
            extract_reply(out),
            Err(ProviderError::EmptyText(r)) if r == "MAX_TOKENS"
        ));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = GeminiService::new(cfg("ftp://example.com")).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_as_error() {
        let svc = GeminiService::new(cfg("http://127.0.0.1:1")).unwrap();
        let contents = vec![Content::text(ContentRole::User, "hi")];
        assert!(svc.generate(&contents).await.is_err());
    }
}
