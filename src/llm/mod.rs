//! LLM integration for askchart.
//!
//! Provides the trait and implementations for the text-completion
//! collaborator the pipeline stages call.

pub mod factory;
pub mod groq;
pub mod mock;
pub mod ollama;

pub use factory::create_client;
pub use groq::{GroqClient, GroqConfig};
pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, OllamaConfig};

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync): one client is shared
/// by concurrent pipeline invocations. No determinism is guaranteed across
/// identical prompts.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given prompt.
    ///
    /// Returns the complete response as a single string. Transport failures
    /// surface as `Generation` errors.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Groq cloud API (OpenAI-compatible).
    #[default]
    Groq,
    /// Local Ollama instance.
    Ollama,
    /// Mock client for testing (no API key required).
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("groq".parse::<LlmProvider>().unwrap(), LlmProvider::Groq);
        assert_eq!("Groq".parse::<LlmProvider>().unwrap(), LlmProvider::Groq);
        assert_eq!(
            "ollama".parse::<LlmProvider>().unwrap(),
            LlmProvider::Ollama
        );
        assert_eq!("mock".parse::<LlmProvider>().unwrap(), LlmProvider::Mock);
        assert!("unknown".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_provider_display() {
        assert_eq!(format!("{}", LlmProvider::Groq), "groq");
        assert_eq!(format!("{}", LlmProvider::Ollama), "ollama");
    }

    #[test]
    fn test_provider_default() {
        assert_eq!(LlmProvider::default(), LlmProvider::Groq);
    }

    #[tokio::test]
    async fn test_mock_client_implements_trait() {
        let client: Box<dyn LlmClient> = Box::new(MockLlmClient::new());
        let response = client
            .complete("Generate a valid SQLite query\nQuestion: show me all orders")
            .await
            .unwrap();
        assert!(response.contains("SELECT"));
    }
}
