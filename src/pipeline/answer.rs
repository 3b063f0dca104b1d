//! Answer generation stage.
//!
//! Summarizes the query outcome in natural language. Always runs last,
//! even after an execution failure: its output overwrites any earlier
//! answer, including the execution-failure placeholder.

use crate::error::Result;
use crate::llm::LlmClient;
use crate::pipeline::PipelineState;

/// Final pipeline stage: result → natural-language answer.
pub struct AnswerGenerator<'a> {
    llm: &'a dyn LlmClient,
}

impl<'a> AnswerGenerator<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// Generates the final answer; the trimmed model response replaces
    /// whatever `answer` held before.
    pub async fn run(&self, mut state: PipelineState) -> Result<PipelineState> {
        let result_json =
            serde_json::to_string(&state.result).unwrap_or_else(|_| "[]".to_string());

        let prompt = format!(
            r#"The SQL query executed successfully.

Question: {}
SQL: {}
Result: {}

Please provide a clear, concise answer to the user based on the result."#,
            state.query, state.sql, result_json
        );

        let response = self.llm.complete(&prompt).await?;
        state.answer = response.trim().to_string();
        Ok(state)
    }
}
