//! Forecast augmentation stage.
//!
//! Best-effort: when the result looks like a time series (every row has a
//! "period" and a "value"), a fitted forecast dataset is appended to the
//! chart config. Nothing in this stage can fail the pipeline; every
//! failure leaves the state unchanged.

use tracing::{debug, info, warn};

use crate::error::{AskChartError, Result};
use crate::forecast::Forecaster;
use crate::pipeline::state::{ColorValue, Dataset, PipelineState};

/// Number of future periods the forecast predicts.
pub const FORECAST_HORIZON: usize = 6;

/// Border color of the appended forecast series.
const FORECAST_BORDER_COLOR: &str = "rgba(255,0,0,1)";

/// Fill color of the appended forecast series.
const FORECAST_BACKGROUND_COLOR: &str = "rgba(255,0,0,0.3)";

/// Fourth pipeline stage: optional time-series forecast.
pub struct ForecastAugmenter<'a> {
    forecaster: &'a dyn Forecaster,
}

impl<'a> ForecastAugmenter<'a> {
    pub fn new(forecaster: &'a dyn Forecaster) -> Self {
        Self { forecaster }
    }

    /// Appends a forecast dataset when the result is a usable time series.
    ///
    /// Infallible by contract: skip reasons and fit failures are logged
    /// and swallowed.
    pub fn run(&self, mut state: PipelineState) -> PipelineState {
        match self.try_forecast(&state) {
            Ok(Some(dataset)) => {
                state.chart_config.datasets.push(dataset);
                info!("Forecast added ({} future periods)", FORECAST_HORIZON);
            }
            Ok(None) => debug!("Forecast skipped: result is not a time series"),
            Err(e) => warn!("Forecast skipped: {}", e),
        }
        state
    }

    /// Attempts a forecast; `Ok(None)` means "not applicable".
    fn try_forecast(&self, state: &PipelineState) -> Result<Option<Dataset>> {
        if state.result.is_empty() {
            return Ok(None);
        }

        // Every row must carry both series keys.
        if !state
            .result
            .iter()
            .all(|row| row.contains_key("period") && row.contains_key("value"))
        {
            return Ok(None);
        }

        // Rows whose period does not parse as a date are dropped; the
        // remaining values keep their input order as the temporal axis.
        let mut values = Vec::with_capacity(state.result.len());
        for row in &state.result {
            if !is_parsable_period(&row["period"]) {
                continue;
            }
            let value = as_number(&row["value"])
                .ok_or_else(|| AskChartError::forecast("non-numeric value in series"))?;
            values.push(value);
        }

        if values.is_empty() {
            return Ok(None);
        }

        let forecast = self.forecaster.fit_and_forecast(&values, FORECAST_HORIZON)?;

        Ok(Some(Dataset {
            label: "Forecast".to_string(),
            data: forecast,
            background_color: Some(ColorValue::Single(FORECAST_BACKGROUND_COLOR.to_string())),
            border_color: Some(FORECAST_BORDER_COLOR.to_string()),
        }))
    }
}

/// Returns true when the value can serve as a time-series period.
fn is_parsable_period(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Number(_) => true,
        serde_json::Value::String(s) => parses_as_date(s.trim()),
        _ => false,
    }
}

/// Lenient date parsing over the formats SQL results commonly carry.
fn parses_as_date(s: &str) -> bool {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(s, "%Y/%m/%d").is_ok()
        // "2024-07" style year-month periods
        || NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").is_ok()
        // bare year
        || (s.len() == 4 && s.parse::<u16>().is_ok())
}

/// Extracts a numeric series value.
fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
