// SPDX-License-Identifier: Apache-2.0

//! Query guard
//!
//! The enforcement layer between the query generator and the database:
//! - **Validator**: pure lexical checks (write blocklist, blocked tables)
//! - **Recorder**: per-invocation metrics (timings, rows, tables, denials)
//! - **Guarded executor**: the composition callers invoke
//!
//! Enforcement happens in code, independent of any prompt instructions the
//! upstream generator was given.

pub mod executor;
pub mod metrics;
pub mod types;
pub mod validator;

pub use executor::GuardedExecutor;
pub use metrics::{extract_tables, InvocationMetrics, DEFAULT_PREVIEW_LIMIT};
pub use types::{DenialReason, GuardedOutcome, MetricsSummary, QueryRecord, ValidationOutcome};
pub use validator::QueryValidator;
