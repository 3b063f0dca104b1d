//! Mock database clients for testing.
//!
//! Provides in-memory implementations so the pipeline can be exercised
//! without a database file.

use super::{DatabaseClient, QueryResult, Row, Value};
use crate::error::{AskChartError, Result};
use async_trait::async_trait;

/// Northwind-flavored schema text used by the mock clients.
const MOCK_SCHEMA: &str = r#"CREATE TABLE "Categories" (
    "CategoryID" INTEGER PRIMARY KEY,
    "CategoryName" TEXT,
    "Description" TEXT
)

CREATE TABLE "Orders" (
    "OrderID" INTEGER PRIMARY KEY,
    "CategoryID" INTEGER,
    "OrderDate" TEXT,
    "Total" REAL,
    FOREIGN KEY ("CategoryID") REFERENCES "Categories" ("CategoryID")
)"#;

/// A mock database client that returns predefined results.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseClient {
    fixed_result: Option<QueryResult>,
}

impl MockDatabaseClient {
    /// Creates a new mock client with default canned results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the given result for every query instead of the default rows.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.fixed_result = Some(result);
        self
    }

    /// Convenience: a mock whose every query yields category/total rows.
    pub fn with_category_totals() -> Self {
        Self::new().with_result(QueryResult::with_data(
            vec!["CategoryName".to_string(), "total".to_string()],
            vec![
                vec![Value::from("Beverages"), Value::Float(4680.5)],
                vec![Value::from("Condiments"), Value::Float(1530.0)],
                vec![Value::from("Produce"), Value::Float(2586.8)],
            ],
        ))
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn schema_text(&self) -> Result<String> {
        Ok(MOCK_SCHEMA.to_string())
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Some(result) = &self.fixed_result {
            return Ok(result.clone());
        }

        let sql_upper = sql.to_uppercase();
        if sql_upper.trim_start().starts_with("SELECT") {
            let columns = vec!["result".to_string()];
            let rows: Vec<Row> = vec![vec![Value::String(format!("Mock result for: {}", sql))]];
            Ok(QueryResult::with_data(columns, rows))
        } else {
            Ok(QueryResult::new())
        }
    }
}

/// A mock database client whose queries always fail.
///
/// Used to test the recoverable execution-failure path.
#[derive(Debug, Clone, Default)]
pub struct FailingDatabaseClient;

impl FailingDatabaseClient {
    /// Creates a new failing client.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn schema_text(&self) -> Result<String> {
        Ok(MOCK_SCHEMA.to_string())
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(AskChartError::execution("no such table: Orderz"))
    }
}
