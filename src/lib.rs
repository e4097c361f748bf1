// SPDX-License-Identifier: Apache-2.0

//! sqlgate — role-based SQL access-control gateway.
//!
//! Sits between an autonomous query generator (typically an LLM agent) and
//! the database. The generator is untrusted: prompt instructions are
//! advisory only, and this layer is the enforced boundary. Every query is
//! validated against the caller's role before it reaches the executor:
//! write operations are always rejected, and references to tables outside
//! the role's allow-list are denied with a human-readable reason the agent
//! can relay.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqlgate::{GuardedExecutor, RoleId, RoleRegistry};
//! # use sqlgate::engine::SqlExecutor;
//! # async fn demo(executor: Arc<dyn SqlExecutor>) -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(RoleRegistry::default());
//! let guarded = GuardedExecutor::new(executor, registry, RoleId::Encoder)?;
//!
//! guarded.reset_metrics(); // start of an invocation
//! let outcome = guarded.execute(r#"SELECT * FROM "Expenses" LIMIT 10"#).await?;
//! let summary = guarded.metrics_snapshot();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod guard;
pub mod observability;
pub mod roles;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

pub use config::{ConfigError, GatewayConfig};
pub use engine::{ExecutorError, FetchMode, PostgresExecutor, QueryResult, SqlExecutor};
pub use guard::{
    DenialReason, GuardedExecutor, GuardedOutcome, InvocationMetrics, MetricsSummary,
    QueryValidator, ValidationOutcome,
};
pub use roles::{DenialMessages, RegistryError, RoleId, RoleRegistry};

/// Top-level error for gateway bootstrap.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Creates a role-restricted database handle using the default registry.
///
/// The returned wrapper only allows access to tables permitted for `role`;
/// the surrounding system keeps one such handle per role for the lifetime
/// of the process.
pub async fn connect_guarded(
    config: &GatewayConfig,
    role: RoleId,
) -> Result<GuardedExecutor, GatewayError> {
    connect_guarded_with_registry(config, role, Arc::new(RoleRegistry::default())).await
}

/// Same as [`connect_guarded`] but with a caller-supplied registry.
pub async fn connect_guarded_with_registry(
    config: &GatewayConfig,
    role: RoleId,
    registry: Arc<RoleRegistry>,
) -> Result<GuardedExecutor, GatewayError> {
    let table_count = registry.tables_for(role)?.len();
    info!(%role, tables = table_count, "connecting to database");

    let executor = PostgresExecutor::connect(&config.database_url, config.max_connections).await?;
    let guarded = GuardedExecutor::new(Arc::new(executor), registry, role)?
        .with_preview_limit(config.preview_limit);

    info!(%role, "database connected");
    Ok(guarded)
}
