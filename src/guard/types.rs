// SPDX-License-Identifier: Apache-2.0

//! Gateway types
//!
//! Validation outcomes, per-query records, and the in-band result the
//! guarded executor hands back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::types::QueryResult;

/// Why a query was denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DenialReason {
    /// A write keyword appeared in the query text.
    WriteOperation { keyword: String },
    /// The query referenced a table outside the role's allow-list.
    TableAccess { table: String },
}

/// Result of validating one query against a role.
///
/// Immutable, returned synchronously, and free of side effects: the
/// validator never touches the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ValidationOutcome {
    Allowed,
    Denied { reason: DenialReason },
}

impl ValidationOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn denied(reason: DenialReason) -> Self {
        Self::Denied { reason }
    }
}

/// One entry in the per-invocation query log.
///
/// Carries a truncated SQL preview rather than the full text, so metrics
/// can be surfaced without leaking whole payloads into logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub sql_preview: String,
    pub duration_ms: f64,
    pub row_count: usize,
    pub blocked: bool,
}

impl QueryRecord {
    pub fn new(sql: &str, preview_limit: usize, duration_ms: f64, row_count: usize, blocked: bool) -> Self {
        let mut preview: String = sql.chars().take(preview_limit).collect();
        if sql.chars().nth(preview_limit).is_some() {
            preview.push_str("...");
        }

        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sql_preview: preview,
            duration_ms,
            row_count,
            blocked,
        }
    }
}

/// Read-only projection of the recorder state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub query_count: usize,
    pub total_duration_ms: f64,
    pub total_rows: usize,
    /// Distinct tables touched, sorted.
    pub tables_queried: Vec<String>,
    pub blocked_count: usize,
}

/// What the guarded executor hands back for a validated query.
///
/// Denial is an expected, frequently-occurring outcome the calling agent
/// must branch on, so it is a value here rather than an error. Underlying
/// execution failures surface as `Err(ExecutorError)` instead.
#[derive(Debug, Clone)]
pub enum GuardedOutcome {
    /// Validation passed and the executor ran the query.
    Completed(QueryResult),
    /// Validation rejected the query before it reached the database.
    Blocked {
        reason: DenialReason,
        message: String,
    },
}

impl GuardedOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_sql() {
        let sql = "SELECT ".to_string() + &"x".repeat(200);
        let record = QueryRecord::new(&sql, 100, 0.0, 0, false);
        assert_eq!(record.sql_preview.chars().count(), 103); // 100 + "..."
        assert!(record.sql_preview.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_sql_intact() {
        let record = QueryRecord::new("SELECT 1", 100, 0.0, 0, false);
        assert_eq!(record.sql_preview, "SELECT 1");
    }

    #[test]
    fn denial_reason_serializes_with_kind_tag() {
        let reason = DenialReason::TableAccess { table: "CashFlow".to_string() };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "table_access");
        assert_eq!(json["table"], "CashFlow");
    }
}
