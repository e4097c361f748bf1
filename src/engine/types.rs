// SPDX-License-Identifier: Apache-2.0

//! Universal result types for the executor seam
//!
//! A normalized representation of query results, independent of the
//! underlying driver.

use serde::{Deserialize, Serialize};

/// How many rows the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// All rows of the result set.
    All,
    /// At most one row.
    One,
}

impl Default for FetchMode {
    fn default() -> Self {
        Self::All
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

/// A single result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

/// Result of an executed query.
///
/// Executors that materialize typed rows return `Rows`; executors that can
/// only hand back pre-rendered output (some agent toolkits return result
/// sets as text) return `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryResult {
    Rows { columns: Vec<String>, rows: Vec<Row> },
    Text(String),
}

impl QueryResult {
    /// Empty row set with no columns.
    pub fn empty() -> Self {
        Self::Rows {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Row count, exact for `Rows`, estimated by line count for `Text`.
    pub fn row_count(&self) -> usize {
        match self {
            Self::Rows { rows, .. } => rows.len(),
            Self::Text(text) => text.lines().filter(|line| !line.trim().is_empty()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_is_exact_for_rows() {
        let result = QueryResult::Rows {
            columns: vec!["id".to_string()],
            rows: vec![
                Row { values: vec![Value::Int(1)] },
                Row { values: vec![Value::Int(2)] },
            ],
        };
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn row_count_estimates_text_by_lines() {
        let result = QueryResult::Text("(1, 'a')\n(2, 'b')\n(3, 'c')".to_string());
        assert_eq!(result.row_count(), 3);
    }

    #[test]
    fn empty_text_counts_zero_rows() {
        assert_eq!(QueryResult::Text(String::new()).row_count(), 0);
        assert_eq!(QueryResult::empty().row_count(), 0);
    }
}
