//! Chart inference stage.
//!
//! Asks the model to pick a chart type and configuration for the result,
//! parses the embedded JSON, and synthesizes colors for each dataset.
//! Unparsable responses degrade to a plain table with an empty config.

use tracing::{info, warn};

use crate::error::Result;
use crate::llm::LlmClient;
use crate::pipeline::color::random_color;
use crate::pipeline::json::extract_json_object;
use crate::pipeline::state::{ChartConfig, ChartType, ColorValue, PipelineState};

/// Third pipeline stage: result → chart type + chart config.
pub struct ChartConfigGenerator<'a> {
    llm: &'a dyn LlmClient,
}

/// Shape of the JSON object the model is asked to emit.
#[derive(Debug, serde::Deserialize)]
struct ChartSuggestion {
    #[serde(default)]
    chart_type: Option<String>,
    #[serde(default)]
    chart_config: Option<ChartConfig>,
}

impl<'a> ChartConfigGenerator<'a> {
    pub fn new(llm: &'a dyn LlmClient) -> Self {
        Self { llm }
    }

    /// Infers the chart configuration for the state's result.
    ///
    /// Model transport failures propagate; parse failures of the model's
    /// output do not (they fall back to the table default).
    pub async fn run(&self, mut state: PipelineState) -> Result<PipelineState> {
        let prompt = build_prompt(&state);
        let response = self.llm.complete(&prompt).await?;

        let (chart_type, chart_config) = parse_suggestion(&response);
        state.chart_type = chart_type;
        state.chart_config = apply_colors(chart_type, chart_config);
        Ok(state)
    }
}

/// Builds the chart-inference prompt.
fn build_prompt(state: &PipelineState) -> String {
    let result_json = serde_json::to_string(&state.result).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a data visualization assistant.
Based on the SQL query result below, suggest the best chart type and config.

Question: {}
SQL: {}
Result: {}

Rules:
- Choose chart_type from: ["bar", "line", "pie", "table"].
- Output JSON only with keys: chart_type, chart_config.
- chart_config must have "labels" and "datasets" compatible with Chart.js."#,
        state.query, state.sql, result_json
    )
}

/// Parses the model's response into a chart type and config.
///
/// Any failure — no `{...}` substring, invalid JSON, unknown chart type on
/// a missing key — falls back to `(Table, empty)`.
fn parse_suggestion(response: &str) -> (ChartType, ChartConfig) {
    let Some(json) = extract_json_object(response) else {
        warn!("Invalid chart config response: {}", response.trim());
        return (ChartType::Table, ChartConfig::empty());
    };

    match serde_json::from_str::<ChartSuggestion>(json) {
        Ok(suggestion) => {
            let chart_type = suggestion
                .chart_type
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(ChartType::Table);
            let chart_config = suggestion.chart_config.unwrap_or_else(ChartConfig::empty);
            (chart_type, chart_config)
        }
        Err(e) => {
            warn!("JSON parse error in chart config: {}", e);
            (ChartType::Table, ChartConfig::empty())
        }
    }
}

/// Synthesizes colors for each dataset.
///
/// Bar/pie datasets (with labels) get one random background color per
/// label; line datasets get a single opaque border color and a translucent
/// fill. Model-supplied colors are overwritten.
fn apply_colors(chart_type: ChartType, mut config: ChartConfig) -> ChartConfig {
    if config.datasets.is_empty() {
        return config;
    }

    let label_count = config.labels.len();

    for dataset in &mut config.datasets {
        match chart_type {
            ChartType::Bar | ChartType::Pie if label_count > 0 => {
                dataset.background_color = Some(ColorValue::PerLabel(
                    (0..label_count).map(|_| random_color(0.7)).collect(),
                ));
            }
            ChartType::Line => {
                dataset.border_color = Some(random_color(1.0));
                dataset.background_color = Some(ColorValue::Single(random_color(0.2)));
            }
            _ => {}
        }
    }

    info!("Applied random colors for {} chart", chart_type);
    config
}
