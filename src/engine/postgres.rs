// SPDX-License-Identifier: Apache-2.0

//! PostgreSQL executor
//!
//! Implements the SqlExecutor trait over a SQLx connection pool. Values
//! are extracted with a best-effort type ladder; anything the ladder does
//! not recognize comes back as `Value::Null`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row as SqlxRow};
use tracing::debug;

use crate::engine::error::{ExecutorError, ExecutorResult};
use crate::engine::traits::SqlExecutor;
use crate::engine::types::{FetchMode, QueryResult, Row, Value};

/// SQLx-backed Postgres executor.
pub struct PostgresExecutor {
    pool: PgPool,
}

impl PostgresExecutor {
    /// Connects a pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> ExecutorResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| ExecutorError::connection_failed(e.to_string()))?;

        debug!(max_connections, "postgres pool connected");
        Ok(Self { pool })
    }

    /// Wraps an existing pool, for callers that manage their own.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn convert_row(pg_row: &PgRow) -> Row {
        let values: Vec<Value> = pg_row
            .columns()
            .iter()
            .map(|col| Self::extract_value(pg_row, col.ordinal()))
            .collect();

        Row { values }
    }

    /// Extracts a value from a PgRow at the given index.
    ///
    /// Uses `try_get` with `Option<T>` so NULLs come through gracefully.
    fn extract_value(row: &PgRow, idx: usize) -> Value {
        if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
            return v.map(Value::Int).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
            return v.map(|i| Value::Int(i as i64)).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<i16>, _>(idx) {
            return v.map(|i| Value::Int(i as i64)).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
            return v.map(Value::Bool).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
            return v.map(Value::Float).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
            return v.map(|f| Value::Float(f as f64)).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
            return v.map(Value::Text).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<serde_json::Value>, _>(idx) {
            return v.map(Value::Json).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
            return v.map(|u| Value::Text(u.to_string())).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
            return v.map(|dt| Value::Text(dt.to_rfc3339())).unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
            return v
                .map(|dt| Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
                .unwrap_or(Value::Null);
        }
        if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
            return v
                .map(|d| Value::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null);
        }

        Value::Null
    }

    fn map_error(e: sqlx::Error) -> ExecutorError {
        match e {
            sqlx::Error::PoolTimedOut => ExecutorError::Timeout { timeout_ms: 0 },
            sqlx::Error::Io(io) => ExecutorError::connection_failed(io.to_string()),
            other => ExecutorError::query_failed(other.to_string()),
        }
    }
}

#[async_trait]
impl SqlExecutor for PostgresExecutor {
    fn executor_id(&self) -> &'static str {
        "postgres"
    }

    async fn run(&self, sql: &str, fetch: FetchMode) -> ExecutorResult<QueryResult> {
        let pg_rows: Vec<PgRow> = match fetch {
            FetchMode::All => sqlx::query(sql)
                .fetch_all(&self.pool)
                .await
                .map_err(Self::map_error)?,
            FetchMode::One => sqlx::query(sql)
                .fetch_optional(&self.pool)
                .await
                .map_err(Self::map_error)?
                .into_iter()
                .collect(),
        };

        let columns: Vec<String> = pg_rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let rows: Vec<Row> = pg_rows.iter().map(Self::convert_row).collect();

        Ok(QueryResult::Rows { columns, rows })
    }
}
