// SPDX-License-Identifier: Apache-2.0

//! Guarded execution wrapper
//!
//! The object callers actually invoke. Composes the validator and the
//! metrics recorder around the real executor by explicit composition: the
//! wrapper holds the executor and is the only route to it, so every
//! execution attempt is validated and recorded.
//!
//! Per query the states are
//! `Received → Validated{Allowed|Denied} → [Executing → Completed] | Rejected`.
//! No retries at this layer; retry policy belongs to the calling
//! orchestration.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::engine::error::{ExecutorError, ExecutorResult};
use crate::engine::traits::SqlExecutor;
use crate::engine::types::FetchMode;
use crate::guard::metrics::{extract_tables, InvocationMetrics};
use crate::guard::types::{DenialReason, GuardedOutcome, MetricsSummary, ValidationOutcome};
use crate::guard::validator::QueryValidator;
use crate::roles::{DenialMessages, RegistryResult, RoleId, RoleRegistry};

/// Role-restricted wrapper around a [`SqlExecutor`].
///
/// Designed as one long-lived handle per role, shared across all requests
/// for that role. The recorder inside is scoped to one conversational turn
/// and reset at the start of each turn, so invocations under the same role
/// must be serialized (or each given its own wrapper); the lock prevents
/// corruption but not interleaved metrics.
pub struct GuardedExecutor {
    executor: Arc<dyn SqlExecutor>,
    registry: Arc<RoleRegistry>,
    validator: QueryValidator,
    messages: DenialMessages,
    role: RoleId,
    metrics: RwLock<InvocationMetrics>,
}

impl GuardedExecutor {
    /// Builds a guarded handle for `role`.
    ///
    /// Fails fast with `UnknownRole` if the role is absent from the
    /// registry; that is a programming error upstream, not a runtime
    /// condition to recover from.
    pub fn new(
        executor: Arc<dyn SqlExecutor>,
        registry: Arc<RoleRegistry>,
        role: RoleId,
    ) -> RegistryResult<Self> {
        registry.tables_for(role)?;
        let validator = QueryValidator::new(Arc::clone(&registry))?;

        Ok(Self {
            executor,
            registry,
            validator,
            messages: DenialMessages::default(),
            role,
            metrics: RwLock::new(InvocationMetrics::new()),
        })
    }

    /// Replaces the denial message table.
    pub fn with_messages(mut self, messages: DenialMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the SQL preview truncation bound for recorded queries.
    pub fn with_preview_limit(self, limit: usize) -> Self {
        *self.metrics.write() = InvocationMetrics::with_preview_limit(limit);
        self
    }

    pub fn role(&self) -> RoleId {
        self.role
    }

    /// The role's allow-list, sorted. Agents use this for schema discovery
    /// so restricted tables are never even visible.
    pub fn visible_tables(&self) -> Vec<String> {
        self.registry
            .tables_for(self.role)
            .map(|tables| tables.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Validates and, if allowed, executes `sql` with [`FetchMode::All`].
    pub async fn execute(&self, sql: &str) -> ExecutorResult<GuardedOutcome> {
        self.execute_with(sql, FetchMode::All).await
    }

    /// Validates and, if allowed, executes `sql`.
    ///
    /// A denial comes back as `Ok(GuardedOutcome::Blocked { .. })` with a
    /// human-readable reason: the calling agent must be able to read it and
    /// adapt rather than crash the conversation. Failures from the
    /// underlying executor (connectivity, malformed SQL that passed the
    /// lexical checks) propagate as `Err` unchanged; no retry, no recovery
    /// here.
    pub async fn execute_with(&self, sql: &str, fetch: FetchMode) -> ExecutorResult<GuardedOutcome> {
        let tables = extract_tables(sql);

        let outcome = self
            .validator
            .check(sql, self.role)
            .map_err(|e| ExecutorError::internal(e.to_string()))?;

        match outcome {
            ValidationOutcome::Denied { reason } => {
                let message = match &reason {
                    DenialReason::WriteOperation { keyword } => self.messages.explain_write(keyword),
                    DenialReason::TableAccess { table } => self.messages.explain(self.role, table),
                };
                warn!(role = %self.role, %message, "query blocked");
                self.metrics.write().record(sql, 0.0, 0, tables, true);
                Ok(GuardedOutcome::Blocked { reason, message })
            }
            ValidationOutcome::Allowed => {
                let start = Instant::now();
                let result = self.executor.run(sql, fetch).await?;
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                let row_count = result.row_count();

                debug!(
                    role = %self.role,
                    executor = self.executor.executor_id(),
                    duration_ms,
                    row_count,
                    "query executed"
                );
                self.metrics.write().record(sql, duration_ms, row_count, tables, false);
                Ok(GuardedOutcome::Completed(result))
            }
        }
    }

    /// Read-only snapshot of the current invocation's metrics.
    pub fn metrics_snapshot(&self) -> MetricsSummary {
        self.metrics.read().snapshot()
    }

    /// Clears the recorder. The caller invokes this at the start of each
    /// logical invocation; the gateway never auto-resets.
    pub fn reset_metrics(&self) {
        self.metrics.write().reset();
    }
}
