//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on which pipeline stage the
//! prompt came from.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on prompt patterns.
///
/// Used for unit and integration testing without making real API calls.
/// Recognizes the three stage prompts (SQL generation, chart inference,
/// answer generation) and replies with plausible output for each.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response), checked first.
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the prompt contains `pattern`, the mock returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Generates a mock response based on the prompt.
    fn mock_response(&self, prompt: &str) -> String {
        let prompt_lower = prompt.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        // Stage detection mirrors the phrasing of the stage prompts.
        if prompt_lower.contains("expert sql assistant") {
            return "```sql\nSELECT c.\"CategoryName\", SUM(o.\"Total\") AS total \
                    FROM \"Orders\" o JOIN \"Categories\" c \
                    ON o.\"CategoryID\" = c.\"CategoryID\" \
                    GROUP BY c.\"CategoryName\"\n```"
                .to_string();
        }

        if prompt_lower.contains("data visualization assistant") {
            return r#"Here is my suggestion:
{
  "chart_type": "bar",
  "chart_config": {
    "labels": ["Beverages", "Condiments", "Produce"],
    "datasets": [
      {"label": "Total Sales", "data": [4680.5, 1530.0, 2586.8]}
    ]
  }
}"#
            .to_string();
        }

        if prompt_lower.contains("concise answer") {
            return "Beverages lead with 4680.50 in total sales, followed by Produce \
                    (2586.80) and Condiments (1530.00)."
                .to_string();
        }

        "I don't understand that prompt.".to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(self.mock_response(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sql_prompt() {
        let client = MockLlmClient::new();
        let response = client
            .complete("You are an expert SQL assistant. Question: total sales per category")
            .await
            .unwrap();
        assert!(response.contains("SELECT"));
        assert!(response.starts_with("```sql"));
    }

    #[tokio::test]
    async fn test_mock_chart_prompt() {
        let client = MockLlmClient::new();
        let response = client
            .complete("You are a data visualization assistant. Result: []")
            .await
            .unwrap();
        assert!(response.contains("chart_type"));
        assert!(response.contains("chart_config"));
    }

    #[tokio::test]
    async fn test_mock_answer_prompt() {
        let client = MockLlmClient::new();
        let response = client
            .complete("Please provide a clear, concise answer to the user based on the result.")
            .await
            .unwrap();
        assert!(!response.is_empty());
        assert!(!response.contains("```"));
    }

    #[tokio::test]
    async fn test_mock_custom_response() {
        let client = MockLlmClient::new().with_response("expert sql", "SELECT 42");
        let response = client
            .complete("You are an expert SQL assistant.")
            .await
            .unwrap();
        assert_eq!(response, "SELECT 42");
    }

    #[tokio::test]
    async fn test_mock_unknown_prompt() {
        let client = MockLlmClient::new();
        let response = client.complete("what is the meaning of life?").await.unwrap();
        assert!(response.contains("don't understand"));
    }
}
