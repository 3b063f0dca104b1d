//! The question-to-chart pipeline.
//!
//! Five stages run strictly in sequence, each consuming the prior state
//! and producing the next one: SQL generation, SQL execution, chart
//! inference, optional forecast augmentation, answer generation. No stage
//! is retried or skipped; a recoverable execution failure degrades the
//! state but the sequence still runs to completion.

mod answer;
mod chart;
mod color;
mod execute;
mod forecast;
mod json;
mod sql_gen;
mod state;

pub use answer::AnswerGenerator;
pub use chart::ChartConfigGenerator;
pub use execute::SqlExecutor;
pub use forecast::{ForecastAugmenter, FORECAST_HORIZON};
pub use json::extract_json_object;
pub use sql_gen::{strip_sql_fences, SqlGenerator};
pub use state::{ChartConfig, ChartType, ColorValue, Dataset, PipelineState};

use tracing::{debug, info};

use crate::db::DatabaseClient;
use crate::error::{AskChartError, Result};
use crate::forecast::{ArimaForecaster, Forecaster};
use crate::llm::LlmClient;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GenerateSql,
    ExecuteSql,
    InferChart,
    Forecast,
    GenerateAnswer,
}

impl Stage {
    /// The fixed execution sequence.
    pub const SEQUENCE: [Stage; 5] = [
        Stage::GenerateSql,
        Stage::ExecuteSql,
        Stage::InferChart,
        Stage::Forecast,
        Stage::GenerateAnswer,
    ];

    /// Returns the stage name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateSql => "generate_sql",
            Self::ExecuteSql => "execute_sql",
            Self::InferChart => "generate_chart_config",
            Self::Forecast => "add_forecast",
            Self::GenerateAnswer => "generate_answer",
        }
    }
}

/// Orchestrates the five stages over injected collaborators.
///
/// One pipeline may serve concurrent requests: the collaborators are
/// shared read-only and each `run` owns its own state.
pub struct Pipeline {
    db: Box<dyn DatabaseClient>,
    llm: Box<dyn LlmClient>,
    forecaster: Box<dyn Forecaster>,
}

impl Pipeline {
    /// Creates a pipeline with the default ARIMA forecaster.
    pub fn new(db: Box<dyn DatabaseClient>, llm: Box<dyn LlmClient>) -> Self {
        Self {
            db,
            llm,
            forecaster: Box::new(ArimaForecaster::new()),
        }
    }

    /// Replaces the forecasting engine.
    pub fn with_forecaster(mut self, forecaster: Box<dyn Forecaster>) -> Self {
        self.forecaster = forecaster;
        self
    }

    /// Runs the full pipeline for one query.
    ///
    /// Never fails for SQL execution or forecast problems; may fail with a
    /// `Generation` error when an LLM-backed stage cannot reach the model.
    pub async fn run(&self, query: &str) -> Result<PipelineState> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AskChartError::internal("query must not be empty"));
        }

        info!("Received query: {}", query);
        let mut state = PipelineState::new(query);

        for stage in Stage::SEQUENCE {
            debug!("Entering stage: {}", stage.name());
            state = match stage {
                Stage::GenerateSql => {
                    SqlGenerator::new(self.llm.as_ref(), self.db.as_ref())
                        .run(state)
                        .await?
                }
                Stage::ExecuteSql => SqlExecutor::new(self.db.as_ref()).run(state).await,
                Stage::InferChart => {
                    ChartConfigGenerator::new(self.llm.as_ref()).run(state).await?
                }
                Stage::Forecast => ForecastAugmenter::new(self.forecaster.as_ref()).run(state),
                Stage::GenerateAnswer => {
                    AnswerGenerator::new(self.llm.as_ref()).run(state).await?
                }
            };
        }

        Ok(state)
    }
}
