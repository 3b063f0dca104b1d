//! SQL execution stage.
//!
//! Runs the generated statement and converts the result set into ordered
//! row mappings. Execution failure is recoverable: it yields an empty
//! result and a placeholder answer instead of halting the pipeline.

use tracing::{error, info};

use crate::db::DatabaseClient;
use crate::error::AskChartError;
use crate::pipeline::PipelineState;

/// Second pipeline stage: run the SQL against the database.
pub struct SqlExecutor<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> SqlExecutor<'a> {
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Executes `state.sql` and fills `state.result`.
    ///
    /// On failure the state degrades (empty result, error text in
    /// `answer`) and the pipeline continues; the answer stage will
    /// overwrite that text with a summary of the empty result.
    pub async fn run(&self, mut state: PipelineState) -> PipelineState {
        match self.db.execute_query(&state.sql).await {
            Ok(result) => {
                state.result = result.into_rows();
                info!("Query returned {} rows", state.result.len());
            }
            Err(e) => {
                let detail = match &e {
                    AskChartError::Execution(msg) => msg.clone(),
                    other => other.to_string(),
                };
                error!("SQL execution error: {}", detail);
                state.result = Vec::new();
                state.answer = format!("SQL Execution Error: {}", detail);
            }
        }

        state
    }
}
