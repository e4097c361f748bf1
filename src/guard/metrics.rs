// SPDX-License-Identifier: Apache-2.0

//! Invocation metrics recorder
//!
//! Accumulates per-query records across one agent invocation (one user
//! turn, potentially several underlying queries as the agent iterates).
//! The recorder has no notion of an invocation itself: the caller resets
//! it at each invocation boundary.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::guard::types::{MetricsSummary, QueryRecord};

/// Default truncation bound for SQL previews.
pub const DEFAULT_PREVIEW_LIMIT: usize = 100;

/// Matches the token following FROM or JOIN, optionally double-quoted.
static TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn table_pattern() -> &'static Regex {
    TABLE_PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)(?:FROM|JOIN)\s+"?(\w+)"?"#).expect("table extraction pattern compiles")
    })
}

/// Best-effort lexical extraction of table names from query text.
///
/// Subqueries and CTEs can make this under- or over-count; it exists for
/// observability, not enforcement.
pub fn extract_tables(sql: &str) -> BTreeSet<String> {
    table_pattern()
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-invocation accumulator of executed and blocked queries.
///
/// Not safe to share across concurrent invocations; the guarded executor
/// keeps one instance behind a lock and assumes single-flight usage per
/// role.
pub struct InvocationMetrics {
    preview_limit: usize,
    entries: Vec<QueryRecord>,
    total_duration_ms: f64,
    total_rows: usize,
    tables: BTreeSet<String>,
    blocked_count: usize,
}

impl InvocationMetrics {
    pub fn new() -> Self {
        Self::with_preview_limit(DEFAULT_PREVIEW_LIMIT)
    }

    pub fn with_preview_limit(preview_limit: usize) -> Self {
        Self {
            preview_limit,
            entries: Vec::new(),
            total_duration_ms: 0.0,
            total_rows: 0,
            tables: BTreeSet::new(),
            blocked_count: 0,
        }
    }

    /// Appends one entry and updates the running totals.
    pub fn record(
        &mut self,
        sql: &str,
        duration_ms: f64,
        row_count: usize,
        tables: BTreeSet<String>,
        blocked: bool,
    ) {
        let duration_ms = round1(duration_ms);
        self.entries.push(QueryRecord::new(
            sql,
            self.preview_limit,
            duration_ms,
            row_count,
            blocked,
        ));
        self.total_duration_ms += duration_ms;
        self.total_rows += row_count;
        self.tables.extend(tables);
        if blocked {
            self.blocked_count += 1;
        }
    }

    /// Clears everything back to the zero state. Called by the owner at
    /// each new invocation boundary.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.total_duration_ms = 0.0;
        self.total_rows = 0;
        self.tables.clear();
        self.blocked_count = 0;
    }

    /// Read-only projection; never mutates state.
    pub fn snapshot(&self) -> MetricsSummary {
        MetricsSummary {
            query_count: self.entries.len(),
            total_duration_ms: round1(self.total_duration_ms),
            total_rows: self.total_rows,
            tables_queried: self.tables.iter().cloned().collect(),
            blocked_count: self.blocked_count,
        }
    }

    /// The ordered per-query records of the current invocation.
    pub fn entries(&self) -> &[QueryRecord] {
        &self.entries
    }
}

impl Default for InvocationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
