//! SQL generation stage.
//!
//! Asks the model for a SQL statement matching the user's question and the
//! database schema, then normalizes away any markdown fences the model
//! added despite instructions.

use tracing::info;

use crate::db::DatabaseClient;
use crate::error::Result;
use crate::llm::LlmClient;
use crate::pipeline::PipelineState;

/// First pipeline stage: natural language → SQL.
pub struct SqlGenerator<'a> {
    llm: &'a dyn LlmClient,
    db: &'a dyn DatabaseClient,
}

impl<'a> SqlGenerator<'a> {
    pub fn new(llm: &'a dyn LlmClient, db: &'a dyn DatabaseClient) -> Self {
        Self { llm, db }
    }

    /// Generates SQL for the state's query.
    ///
    /// The result is not validated; invalid SQL surfaces at execution time.
    /// A transport failure from the model propagates as a pipeline error.
    pub async fn run(&self, mut state: PipelineState) -> Result<PipelineState> {
        let schema = self.db.schema_text().await?;
        let prompt = build_prompt(&state.query, &schema);

        let response = self.llm.complete(&prompt).await?;
        let sql = strip_sql_fences(&response);

        info!("Generated SQL: {}", sql);
        state.sql = sql;
        Ok(state)
    }
}

/// Builds the SQL-generation prompt.
fn build_prompt(query: &str, schema: &str) -> String {
    format!(
        r#"You are an expert SQL assistant. Generate a valid SQLite query
for the following schema:

{schema}

Notes:
- Use exact table names, **with quotes** if they contain spaces (like "Order Details").
- Always use table aliases consistently.
- Return SQL only (no explanation, no markdown fences).

Question: {query}"#
    )
}

/// Strips a leading ```` ```sql ```` fence (case-insensitive) and a trailing
/// ```` ``` ```` fence from a model response.
///
/// Idempotent: already-clean input comes back unchanged (modulo trimming).
pub fn strip_sql_fences(raw: &str) -> String {
    let mut sql = raw.trim();

    if let Some(prefix) = sql.get(..6) {
        if prefix.eq_ignore_ascii_case("```sql") {
            sql = sql[6..].trim_start();
        }
    }

    if let Some(stripped) = sql.strip_suffix("```") {
        sql = stripped.trim_end();
    }

    sql.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockDatabaseClient;
    use crate::llm::MockLlmClient;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_fenced_sql() {
        assert_eq!(strip_sql_fences("```sql\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_strip_is_case_insensitive() {
        assert_eq!(strip_sql_fences("```SQL\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_unfenced_sql_unchanged() {
        assert_eq!(strip_sql_fences("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = strip_sql_fences("```sql\nSELECT 1\n```");
        assert_eq!(strip_sql_fences(&once), once);
    }

    #[test]
    fn test_trailing_fence_only() {
        assert_eq!(strip_sql_fences("SELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_short_input() {
        assert_eq!(strip_sql_fences(""), "");
        assert_eq!(strip_sql_fences("  x  "), "x");
    }

    #[test]
    fn test_build_prompt_contains_schema_and_question() {
        let prompt = build_prompt("total sales?", "CREATE TABLE t (x)");
        assert!(prompt.contains("CREATE TABLE t (x)"));
        assert!(prompt.contains("Question: total sales?"));
        assert!(prompt.contains("Return SQL only"));
    }

    #[tokio::test]
    async fn test_stage_sets_sql() {
        let llm = MockLlmClient::new();
        let db = MockDatabaseClient::new();
        let stage = SqlGenerator::new(&llm, &db);

        let state = stage
            .run(PipelineState::new("Show me total sales per category"))
            .await
            .unwrap();

        assert!(state.sql.starts_with("SELECT"));
        assert!(!state.sql.contains("```"));
    }
}
