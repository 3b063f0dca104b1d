//! Ollama LLM client implementation.
//!
//! Implements the LlmClient trait for local Ollama instances, so the
//! pipeline can run without API costs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AskChartError, Result};
use crate::llm::LlmClient;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default Ollama API URL.
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama client configuration.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model to use (e.g., "llama3.2:3b").
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Creates a new config with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: model.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new("llama3.2:3b")
    }
}

/// Ollama LLM client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    /// Creates a new Ollama client with the given configuration.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AskChartError::generation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `OLLAMA_URL` for the base URL (defaults to http://localhost:11434)
    /// and `OLLAMA_MODEL` for the model (defaults to "llama3.2:3b").
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2:3b".to_string());

        Self::new(OllamaConfig::new(model).with_url(base_url))
    }

    /// Returns the generate API endpoint URL.
    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AskChartError::generation("Request timed out. Try again.")
                } else if e.is_connect() {
                    AskChartError::generation(
                        "Failed to connect to Ollama. Is it running? Try: ollama serve",
                    )
                } else {
                    AskChartError::generation(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AskChartError::generation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(AskChartError::generation(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let parsed: OllamaResponse = serde_json::from_str(&body)
            .map_err(|e| AskChartError::generation(format!("Failed to parse response: {}", e)))?;

        Ok(parsed.response)
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_url() {
        let config = OllamaConfig::new("llama3.2:3b");
        assert_eq!(config.base_url, DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_generate_url() {
        let client = OllamaClient::new(OllamaConfig::new("m").with_url("http://host:1234")).unwrap();
        assert_eq!(client.generate_url(), "http://host:1234/api/generate");
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"model": "llama3.2:3b", "response": "SELECT 1", "done": true}"#;
        let parsed: OllamaResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "SELECT 1");
    }
}
