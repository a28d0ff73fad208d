//! Gemini config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `GEMINI_API_KEY`           = API key (mandatory)
//! - `GEMINI_MODEL`             = model id (default `gemini-1.5-flash`)
//! - `GEMINI_ENDPOINT`          = API base (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_TIMEOUT_SECS`      = request timeout (default `60`)
//! - `GEMINI_TEMPERATURE`       = optional, `0.0..=2.0`
//! - `GEMINI_TOP_P`             = optional, `0.0..=1.0`
//! - `GEMINI_MAX_OUTPUT_TOKENS` = optional max output tokens (u32)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, must_var, opt_f32, opt_u32, opt_u64, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the Gemini generation config from the process environment.
///
/// # Errors
/// - [`crate::ConfigError::MissingVar`] if `GEMINI_API_KEY` is absent or empty
/// - [`crate::ConfigError::InvalidNumber`] / [`crate::ConfigError::OutOfRange`]
///   for malformed optional knobs
/// - [`crate::ConfigError::InvalidFormat`] if `GEMINI_ENDPOINT` is not http(s)
pub fn config_gemini() -> Result<LlmModelConfig, AiLlmError> {
    config_gemini_from(|name| std::env::var(name).ok())
}

/// Same as [`config_gemini`], reading variables through `lookup`.
pub fn config_gemini_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(&lookup, "GEMINI_API_KEY")?;
    let model = lookup("GEMINI_MODEL")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let endpoint = lookup("GEMINI_ENDPOINT")
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    validate_http_endpoint("GEMINI_ENDPOINT", &endpoint)?;

    let timeout_secs = opt_u64(&lookup, "GEMINI_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let max_tokens = opt_u32(&lookup, "GEMINI_MAX_OUTPUT_TOKENS")?;

    let temperature = opt_f32(&lookup, "GEMINI_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("GEMINI_TEMPERATURE", t, 0.0, 2.0)?;
    }
    let top_p = opt_f32(&lookup, "GEMINI_TOP_P")?;
    if let Some(p) = top_p {
        validate_range_f32("GEMINI_TOP_P", p, 0.0, 1.0)?;
    }

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: api_key.trim().to_string(),
        max_tokens,
        temperature,
        top_p,
        timeout_secs: Some(timeout_secs),
    })
}

/// Shortens a secret for logs: first 8 chars followed by `...`.
pub fn redact_key(key: &str) -> String {
    if key.is_empty() {
        return "None".to_string();
    }
    let head: String = key.chars().take(8).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::ConfigError;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let vars = env(&[("GEMINI_API_KEY", "AIzaSyTestKey123")]);
        let cfg = config_gemini_from(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.api_key, "AIzaSyTestKey123");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let vars = env(&[("GEMINI_API_KEY", "   ")]);
        let err = config_gemini_from(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("GEMINI_API_KEY"))
        ));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let vars = env(&[("GEMINI_API_KEY", "k"), ("GEMINI_TEMPERATURE", "3.5")]);
        let err = config_gemini_from(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let vars = env(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_ENDPOINT", "http://127.0.0.1:9999/"),
            ("GEMINI_TIMEOUT_SECS", "5"),
        ]);
        let cfg = config_gemini_from(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cfg.endpoint, "http://127.0.0.1:9999");
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn redact_key_keeps_eight_chars() {
        assert_eq!(redact_key("AIzaSyABCDEFGH"), "AIzaSyAB...");
        assert_eq!(redact_key("abc"), "abc...");
        assert_eq!(redact_key(""), "None");
    }
}
