//! askchart - natural-language questions over a SQL database.
//!
//! This library exposes the pipeline and its collaborators for use by the
//! CLI binary and integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod response;
