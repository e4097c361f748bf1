// SPDX-License-Identifier: Apache-2.0

//! SqlExecutor trait definition
//!
//! The seam between the gateway and the real database. The guarded wrapper
//! is generic over this trait, so production uses the SQLx-backed Postgres
//! executor and tests substitute an in-memory mock.

use async_trait::async_trait;

use crate::engine::error::ExecutorResult;
use crate::engine::types::{FetchMode, QueryResult};

/// Collaborator interface the gateway wraps.
///
/// Implementations may block on network I/O; the gateway imposes no
/// timeout of its own. Cancellation and timeouts belong to the driver.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Unique identifier for this executor (e.g., "postgres", "mock").
    fn executor_id(&self) -> &'static str;

    /// Executes a query and returns the normalized result.
    ///
    /// Transport and syntax failures surface as `ExecutorError`; the
    /// gateway propagates them to the caller unchanged.
    async fn run(&self, sql: &str, fetch: FetchMode) -> ExecutorResult<QueryResult>;
}
