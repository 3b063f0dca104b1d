//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::error::{AskChartError, Result};
use crate::llm::{
    GroqClient, GroqConfig, LlmClient, LlmProvider, MockLlmClient, OllamaClient, OllamaConfig,
};

/// Creates an LLM client for the given provider.
///
/// For Groq the API key is resolved from `GROQ_API_KEY`; the `model`
/// argument overrides `GROQ_MODEL`/`OLLAMA_MODEL` when set.
pub fn create_client(provider: LlmProvider, model: Option<&str>) -> Result<Box<dyn LlmClient>> {
    match provider {
        LlmProvider::Groq => {
            let key = std::env::var("GROQ_API_KEY").map_err(|_| {
                AskChartError::generation("No API key configured. Set GROQ_API_KEY.")
            })?;
            let model = model
                .map(str::to_string)
                .or_else(|| std::env::var("GROQ_MODEL").ok())
                .unwrap_or_else(|| "gemma2-9b-it".to_string());
            Ok(Box::new(GroqClient::new(GroqConfig::new(key, model))?))
        }
        LlmProvider::Ollama => match model {
            Some(model) => Ok(Box::new(OllamaClient::new(OllamaConfig::new(model))?)),
            None => Ok(Box::new(OllamaClient::from_env()?)),
        },
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
