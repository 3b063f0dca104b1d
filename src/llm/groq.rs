//! Groq LLM client implementation.
//!
//! Implements the LlmClient trait against Groq's OpenAI-compatible chat
//! completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AskChartError, Result};
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Groq chat completions endpoint.
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Maximum number of retry attempts for transient errors.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Groq client configuration.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model to use (e.g., "gemma2-9b-it").
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Creates a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Groq LLM client.
#[derive(Debug, Clone)]
pub struct GroqClient {
    config: GroqConfig,
    client: Client,
}

impl GroqClient {
    /// Creates a new Groq client with the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AskChartError::generation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `GROQ_API_KEY` for the API key and optionally `GROQ_MODEL`
    /// for the model (defaults to "gemma2-9b-it").
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| AskChartError::generation("GROQ_API_KEY environment variable not set"))?;

        let model = std::env::var("GROQ_MODEL").unwrap_or_else(|_| "gemma2-9b-it".to_string());

        Self::new(GroqConfig::new(api_key, model))
    }

    /// Parses an API error response and returns (error, is_retryable).
    fn parse_error(status: reqwest::StatusCode, body: &str) -> (AskChartError, bool) {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return (
                AskChartError::generation("Authentication failed. Check your GROQ_API_KEY."),
                false,
            );
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return (
                AskChartError::generation("Rate limited. Please wait and try again."),
                true,
            );
        }

        let is_retryable = status.is_server_error();

        if let Ok(error_response) = serde_json::from_str::<GroqErrorResponse>(body) {
            return (
                AskChartError::generation(format!(
                    "Groq API error: {}",
                    error_response.error.message
                )),
                is_retryable,
            );
        }

        (
            AskChartError::generation(format!("Groq API error ({}): {}", status, body)),
            is_retryable,
        )
    }

    /// Determines if a request error is retryable.
    fn is_retryable_request_error(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = GroqRequest {
            model: self.config.model.clone(),
            messages: vec![GroqMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let mut last_error = None;
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

        for attempt in 1..=MAX_RETRY_ATTEMPTS {
            debug!(
                "Groq API request attempt {} of {}",
                attempt, MAX_RETRY_ATTEMPTS
            );

            let result = self
                .client
                .post(GROQ_API_URL)
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.map_err(|e| {
                        AskChartError::generation(format!("Failed to read response: {}", e))
                    })?;

                    if status.is_success() {
                        let response: GroqResponse = serde_json::from_str(&body).map_err(|e| {
                            AskChartError::generation(format!("Failed to parse response: {}", e))
                        })?;

                        return response
                            .choices
                            .into_iter()
                            .next()
                            .map(|c| c.message.content)
                            .ok_or_else(|| AskChartError::generation("No response from Groq"));
                    }

                    let (error, is_retryable) = Self::parse_error(status, &body);
                    last_error = Some(error);

                    if !is_retryable || attempt >= MAX_RETRY_ATTEMPTS {
                        break;
                    }

                    warn!(
                        "Groq API request failed (attempt {}), retrying in {:?}: {}",
                        attempt, delay, status
                    );
                }
                Err(e) => {
                    let is_retryable = Self::is_retryable_request_error(&e);
                    let error = if e.is_timeout() {
                        AskChartError::generation("Request timed out. Try again.")
                    } else if e.is_connect() {
                        AskChartError::generation(
                            "Failed to connect to the Groq API. Check your network.",
                        )
                    } else {
                        AskChartError::generation(format!("Request failed: {}", e))
                    };
                    last_error = Some(error);

                    if !is_retryable || attempt >= MAX_RETRY_ATTEMPTS {
                        break;
                    }

                    warn!(
                        "Groq API request failed (attempt {}), retrying in {:?}",
                        attempt, delay
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2; // Exponential backoff
        }

        Err(last_error.unwrap_or_else(|| AskChartError::generation("Groq request failed")))
    }
}

// Groq API types (OpenAI-compatible)

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqError,
}

#[derive(Debug, Deserialize)]
struct GroqError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GroqConfig::new("key", "gemma2-9b-it");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.model, "gemma2-9b-it");
    }

    #[test]
    fn test_config_with_timeout() {
        let config = GroqConfig::new("key", "model").with_timeout(5);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_parse_unauthorized_error() {
        let (err, retryable) = GroqClient::parse_error(reqwest::StatusCode::UNAUTHORIZED, "{}");
        assert!(err.to_string().contains("Authentication failed"));
        assert!(!retryable);
    }

    #[test]
    fn test_parse_rate_limit_is_retryable() {
        let (err, retryable) =
            GroqClient::parse_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(err.to_string().contains("Rate limited"));
        assert!(retryable);
    }

    #[test]
    fn test_parse_server_error_is_retryable() {
        let body = r#"{"error": {"message": "internal error"}}"#;
        let (err, retryable) =
            GroqClient::parse_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(err.to_string().contains("internal error"));
        assert!(retryable);
    }

    #[test]
    fn test_parse_bad_request_not_retryable() {
        let (_, retryable) = GroqClient::parse_error(reqwest::StatusCode::BAD_REQUEST, "nope");
        assert!(!retryable);
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "SELECT 1"}}]}"#;
        let response: GroqResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content, "SELECT 1");
    }
}
