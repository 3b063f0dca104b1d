//! Response envelopes for front-ends wrapping the pipeline.
//!
//! The pipeline returns a `PipelineState`; front-ends (the bundled CLI, or
//! an HTTP layer) serialize one of these envelopes instead of the raw
//! state.

use serde::{Deserialize, Serialize};

use crate::db::ResultRow;
use crate::error::AskChartError;
use crate::pipeline::{ChartConfig, ChartType, PipelineState};

/// Successful query response: answer plus SQL, rows, and chart data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub chart_type: ChartType,
    pub chart_config: ChartConfig,
    pub sql: String,
    pub result: Vec<ResultRow>,
}

impl QueryResponse {
    /// Builds the response from a completed pipeline state.
    pub fn from_state(state: PipelineState) -> Self {
        let answer = if state.answer.is_empty() {
            "No answer generated".to_string()
        } else {
            state.answer
        };

        Self {
            answer,
            chart_type: state.chart_type,
            chart_config: state.chart_config,
            sql: state.sql,
            result: state.result,
        }
    }
}

/// Standardized error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl ErrorResponse {
    /// Builds the envelope from a pipeline error.
    ///
    /// The category goes out; the detail string is the error message, never
    /// a backtrace.
    pub fn from_error(error: &AskChartError) -> Self {
        Self {
            error: error.category().to_string(),
            detail: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_state_carries_fields() {
        let mut state = PipelineState::new("q");
        state.sql = "SELECT 1".to_string();
        state.answer = "One.".to_string();
        state.chart_type = ChartType::Pie;

        let response = QueryResponse::from_state(state);

        assert_eq!(response.answer, "One.");
        assert_eq!(response.sql, "SELECT 1");
        assert_eq!(response.chart_type, ChartType::Pie);
        assert!(response.result.is_empty());
    }

    #[test]
    fn test_empty_answer_gets_placeholder() {
        let response = QueryResponse::from_state(PipelineState::new("q"));
        assert_eq!(response.answer, "No answer generated");
    }

    #[test]
    fn test_error_envelope() {
        let err = AskChartError::generation("model unreachable");
        let envelope = ErrorResponse::from_error(&err);
        assert_eq!(envelope.error, "Generation Error");
        assert!(envelope.detail.contains("model unreachable"));
    }

    #[test]
    fn test_response_serializes_expected_keys() {
        let response = QueryResponse::from_state(PipelineState::new("q"));
        let json = serde_json::to_value(&response).unwrap();
        for key in ["answer", "chart_type", "chart_config", "sql", "result"] {
            assert!(json.get(key).is_some(), "missing key: {key}");
        }
    }
}
