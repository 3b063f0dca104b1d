//! Pipeline state and chart configuration types.
//!
//! `PipelineState` is the record threaded through the five stages. Each
//! stage consumes the prior state and returns a new one, so there is no
//! hidden mutation between stages.

use crate::db::ResultRow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The state record threaded through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PipelineState {
    /// The user's natural-language question (caller-set, never modified).
    pub query: String,

    /// Generated SQL; empty until the SQL generation stage runs.
    pub sql: String,

    /// Result rows as ordered column→value mappings; empty on any
    /// execution failure.
    pub result: Vec<ResultRow>,

    /// Natural-language answer; always set once the pipeline completes.
    pub answer: String,

    /// Suggested chart type.
    pub chart_type: ChartType,

    /// Suggested chart configuration.
    pub chart_config: ChartConfig,
}

impl PipelineState {
    /// Creates a fresh state for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Chart type chosen by the inference stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    /// Fallback when inference fails or no chart fits.
    #[default]
    Table,
}

impl ChartType {
    /// Returns the chart type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Table => "table",
        }
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown chart type: {}", s)),
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart configuration in Chart.js shape: labels plus per-series datasets.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChartConfig {
    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

impl ChartConfig {
    /// The degenerate empty configuration used on parse failure.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One data series of a chart.
///
/// Color fields are synthesized by the pipeline, never taken from the
/// model: bar/pie datasets carry one background color per label, line
/// datasets a single border/fill pair.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub data: Vec<f64>,

    #[serde(
        rename = "backgroundColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<ColorValue>,

    #[serde(
        rename = "borderColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub border_color: Option<String>,
}

/// A background color: one rgba string, or one per label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorValue {
    Single(String),
    PerLabel(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_state_defaults() {
        let state = PipelineState::new("total sales per category");
        assert_eq!(state.query, "total sales per category");
        assert!(state.sql.is_empty());
        assert!(state.result.is_empty());
        assert!(state.answer.is_empty());
        assert_eq!(state.chart_type, ChartType::Table);
        assert_eq!(state.chart_config, ChartConfig::empty());
    }

    #[test]
    fn test_chart_type_round_trip() {
        for name in ["bar", "line", "pie", "table"] {
            let chart_type: ChartType = name.parse().unwrap();
            assert_eq!(chart_type.as_str(), name);
        }
        assert!("scatter".parse::<ChartType>().is_err());
    }

    #[test]
    fn test_chart_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ChartType::Bar).unwrap(), "\"bar\"");
        let parsed: ChartType = serde_json::from_str("\"pie\"").unwrap();
        assert_eq!(parsed, ChartType::Pie);
    }

    #[test]
    fn test_dataset_deserializes_without_colors() {
        let json = r#"{"label": "Sales", "data": [1, 2.5, 3]}"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.label, "Sales");
        assert_eq!(dataset.data, vec![1.0, 2.5, 3.0]);
        assert!(dataset.background_color.is_none());
        assert!(dataset.border_color.is_none());
    }

    #[test]
    fn test_dataset_serializes_color_array() {
        let dataset = Dataset {
            label: "Sales".to_string(),
            data: vec![1.0],
            background_color: Some(ColorValue::PerLabel(vec![
                "rgba(1, 2, 3, 0.7)".to_string(),
            ])),
            border_color: None,
        };
        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json["backgroundColor"][0], "rgba(1, 2, 3, 0.7)");
        assert!(json.get("borderColor").is_none());
    }

    #[test]
    fn test_state_serializes_with_lowercase_chart_type() {
        let state = PipelineState::new("q");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["chart_type"], "table");
        assert_eq!(json["chart_config"]["labels"], serde_json::json!([]));
    }
}
