//! Database abstraction layer for askchart.
//!
//! Provides a trait-based interface for database operations, allowing the
//! pipeline to run against different backends (and test doubles)
//! interchangeably.

mod mock;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use sqlite::SqliteClient;
pub use types::{QueryResult, ResultRow, Row, Value};

use crate::config::DatabaseConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates a database client for the given configuration.
pub fn connect(config: &DatabaseConfig) -> Box<dyn DatabaseClient> {
    Box::new(SqliteClient::new(&config.path))
}

/// Trait defining the interface for database clients.
///
/// Implementations must be safe for concurrent use: multiple pipeline
/// invocations may share one client.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Returns a textual description of the database schema (table DDL)
    /// for prompt construction.
    async fn schema_text(&self) -> Result<String>;

    /// Executes a SQL statement and returns the result set.
    ///
    /// The connection lifetime is scoped to a single call: no pooling, no
    /// transactions held open across calls.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;
}
