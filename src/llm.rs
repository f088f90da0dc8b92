//! Language-model provider abstraction and implementations.
//!
//! Defines the [`LanguageModel`] trait and concrete implementations:
//! - **[`DisabledModel`]** — returns errors; used when no provider is
//!   configured, so dataset-only commands still run without credentials.
//! - **[`GeminiModel`]** — calls the Gemini `generateContent` API.
//!
//! Both calls a question needs (intent extraction and answer composition)
//! go through [`LanguageModel::generate`]; tests substitute a mock. A
//! transport failure surfaces immediately — there is no retry, the question
//! handler reports it to the user and the next question starts clean.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::LlmConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A synchronous-per-question text generation collaborator.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the model identifier (e.g. `"gemini-2.5-flash-lite"`).
    fn model_name(&self) -> &str;

    /// Generate text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// A no-op model that always returns errors.
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        bail!("Language model is disabled. Set [llm] provider in config.")
    }
}

/// Model backed by the Gemini `generateContent` endpoint.
pub struct GeminiModel {
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiModel {
    /// Create a Gemini model from configuration.
    ///
    /// The API key is read from the environment variable named by
    /// `llm.api_key_env`.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", config.api_key_env))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Gemini API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let excerpt = &body_text[..body_text.len().min(300)];
            bail!("Gemini API error {}: {}", status, excerpt);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to read Gemini API response")?;
        parse_gemini_response(&json)
    }
}

/// Extract the generated text from a `generateContent` response.
fn parse_gemini_response(json: &serde_json::Value) -> Result<String> {
    let text = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid Gemini response: missing candidate text"))?;

    Ok(text.to_string())
}

/// Create the appropriate [`LanguageModel`] based on configuration.
pub fn create_model(config: &LlmConfig) -> Result<Box<dyn LanguageModel>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledModel)),
        "gemini" => Ok(Box::new(GeminiModel::new(config)?)),
        other => bail!("Unknown llm provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gemini_response() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"atleta\": \"Jose Perez\"}" }] }
            }]
        });
        assert_eq!(
            parse_gemini_response(&json).unwrap(),
            "{\"atleta\": \"Jose Perez\"}"
        );
    }

    #[test]
    fn test_parse_gemini_response_missing_candidates() {
        let json = serde_json::json!({ "candidates": [] });
        assert!(parse_gemini_response(&json).is_err());

        let json = serde_json::json!({});
        assert!(parse_gemini_response(&json).is_err());
    }

    #[tokio::test]
    async fn test_disabled_model_errors() {
        let model = DisabledModel;
        assert_eq!(model.model_name(), "disabled");
        assert!(model.generate("hola").await.is_err());
    }

    #[test]
    fn test_create_model_dispatch() {
        let disabled = create_model(&LlmConfig::default()).unwrap();
        assert_eq!(disabled.model_name(), "disabled");

        let config = LlmConfig {
            provider: "gemini".to_string(),
            api_key_env: "RANKING_BOT_TEST_KEY_UNSET".to_string(),
            ..LlmConfig::default()
        };
        // Key env var not set — construction must fail, not panic
        assert!(create_model(&config).is_err());
    }
}
