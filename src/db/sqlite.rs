//! SQLite database client implementation.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient`
//! trait using sqlx. Every call opens a fresh connection and closes it when
//! done, so no connection state survives a single operation.

use crate::db::{DatabaseClient, QueryResult, Row, Value};
use crate::error::{AskChartError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column as SqlxColumn, Connection, Row as SqlxRow, TypeInfo};
use std::path::PathBuf;
use tracing::debug;

/// SQLite database client.
///
/// Holds only the database path; connections are per-call.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    path: PathBuf,
}

impl SqliteClient {
    /// Creates a new client for the given database file.
    ///
    /// The file is not touched until the first query.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens a fresh connection to the database file.
    async fn open(&self) -> Result<SqliteConnection> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(false);

        SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| {
                AskChartError::execution(format!(
                    "Cannot open database {}: {}",
                    self.path.display(),
                    format_sqlx_error(&e)
                ))
            })
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn schema_text(&self) -> Result<String> {
        let mut conn = self.open().await?;

        let ddl: Vec<Option<String>> = sqlx::query_scalar(
            r#"
            SELECT sql FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&mut conn)
        .await
        .map_err(|e| {
            AskChartError::execution(format!("Failed to read schema: {}", format_sqlx_error(&e)))
        })?;

        let _ = conn.close().await;

        let schema = ddl.into_iter().flatten().collect::<Vec<_>>().join("\n\n");
        debug!("Loaded schema text ({} bytes)", schema.len());
        Ok(schema)
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let mut conn = self.open().await?;

        let result = sqlx::query(sql).fetch_all(&mut conn).await;
        let _ = conn.close().await;

        let raw_rows =
            result.map_err(|e| AskChartError::execution(format_sqlx_error(&e)))?;

        let columns: Vec<String> = raw_rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows: Vec<Row> = raw_rows.iter().map(convert_row).collect();

        Ok(QueryResult::with_data(columns, rows))
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a SqliteRow to our Value type.
fn convert_value(row: &SqliteRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" | "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // TEXT, DATE, DATETIME, and anything else: fall back to string
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Extracts the driver message from a sqlx error.
fn format_sqlx_error(error: &sqlx::Error) -> String {
    match error {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_database_is_execution_error() {
        let client = SqliteClient::new("/nonexistent/dir/missing.db");
        let err = client.execute_query("SELECT 1").await.unwrap_err();
        assert_eq!(err.category(), "Execution Error");
    }
}
