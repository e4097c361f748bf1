// SPDX-License-Identifier: Apache-2.0

//! Executor seam: the collaborator interface the gateway wraps, plus the
//! production Postgres implementation.

pub mod error;
pub mod postgres;
pub mod traits;
pub mod types;

pub use error::{ExecutorError, ExecutorResult};
pub use postgres::PostgresExecutor;
pub use traits::SqlExecutor;
pub use types::{FetchMode, QueryResult, Row, Value};
