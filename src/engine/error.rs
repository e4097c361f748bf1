// SPDX-License-Identifier: Apache-2.0

//! Normalized error types for the executor seam
//!
//! Driver-specific failures are mapped to these unified variants. The
//! guarded wrapper passes them through to the caller unchanged; a query
//! denied by the validator is NOT an error here, it is an in-band result.

use thiserror::Error;

/// Unified error type for underlying execution failures
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Query failed: {message}")]
    QueryFailed { message: String },

    #[error("Operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ExecutorError {
    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: msg.into() }
    }

    pub fn query_failed(msg: impl Into<String>) -> Self {
        Self::QueryFailed { message: msg.into() }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal { message: msg.into() }
    }
}

/// Result type alias for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
