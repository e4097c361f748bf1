// SPDX-License-Identifier: Apache-2.0

//! Query validator
//!
//! Pure lexical checks applied to every query before it reaches the
//! database: a write-operation blocklist, then a blocked-table scan for
//! the requesting role. This is deliberately NOT a SQL parser: a keyword
//! or table name inside a string literal or comment will still match
//! (false positive), and references assembled through string concatenation
//! the gateway never sees will not (false negative). That trade-off is
//! part of the contract; upgrading to a grammar would change the accepted
//! query set.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::guard::types::{DenialReason, ValidationOutcome};
use crate::roles::{RegistryResult, RoleId, RoleRegistry};

/// Operations that are never allowed, matched as whole words.
static WRITE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn write_pattern() -> &'static Regex {
    WRITE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(INSERT|UPDATE|DELETE|DROP|ALTER|CREATE|TRUNCATE|GRANT|REVOKE)\b")
            .expect("write-operation pattern compiles")
    })
}

struct BlockedTable {
    name: String,
    pattern: Regex,
}

/// Role-aware lexical validator.
///
/// Stateless after construction; `check` is pure and idempotent, safe for
/// unlimited concurrent calls.
pub struct QueryValidator {
    blocked: HashMap<RoleId, Vec<BlockedTable>>,
}

impl QueryValidator {
    /// Precompiles one pattern per blocked table per role.
    ///
    /// The registry is immutable, so this happens exactly once.
    pub fn new(registry: Arc<RoleRegistry>) -> RegistryResult<Self> {
        let mut blocked = HashMap::new();

        for role in registry.roles() {
            let tables: Vec<BlockedTable> = registry
                .blocked_tables_for(role)?
                .into_iter()
                .map(|name| {
                    let escaped = regex::escape(&name);
                    // Matches "TableName" (quoted) or TableName as a bare
                    // word-bounded identifier, in any case.
                    let pattern = Regex::new(&format!(r#"(?i)"{escaped}"|\b{escaped}\b"#))
                        .expect("escaped identifier pattern compiles");
                    BlockedTable { name, pattern }
                })
                .collect();
            blocked.insert(role, tables);
        }

        Ok(Self { blocked })
    }

    /// Validates one query for one role.
    ///
    /// The write-operation check always runs first: a write attempt is
    /// rejected regardless of which table it targets. A role with an empty
    /// blocked set short-circuits to `Allowed` after the write check.
    pub fn check(&self, sql: &str, role: RoleId) -> RegistryResult<ValidationOutcome> {
        if let Some(m) = write_pattern().find(sql) {
            return Ok(ValidationOutcome::denied(DenialReason::WriteOperation {
                keyword: m.as_str().to_string(),
            }));
        }

        let blocked = self
            .blocked
            .get(&role)
            .ok_or_else(|| crate::roles::RegistryError::UnknownRole {
                role: role.to_string(),
            })?;

        for table in blocked {
            if table.pattern.is_match(sql) {
                return Ok(ValidationOutcome::denied(DenialReason::TableAccess {
                    table: table.name.clone(),
                }));
            }
        }

        Ok(ValidationOutcome::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> QueryValidator {
        QueryValidator::new(Arc::new(RoleRegistry::default())).unwrap()
    }

    #[test]
    fn encoder_cannot_read_cash_flow() {
        let outcome = validator()
            .check(r#"SELECT * FROM "CashFlow" WHERE "project_id"=1"#, RoleId::Encoder)
            .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::denied(DenialReason::TableAccess {
                table: "CashFlow".to_string()
            })
        );
    }

    #[test]
    fn admin_can_read_cash_flow() {
        let outcome = validator()
            .check(r#"SELECT * FROM "CashFlow" WHERE "project_id"=1"#, RoleId::Admin)
            .unwrap();
        assert!(outcome.is_allowed());
    }

    #[test]
    fn write_check_fires_before_table_check() {
        // Billing is allowed for ACCOUNTANT, but the DELETE is rejected first.
        let outcome = validator()
            .check(r#"DELETE FROM "Billing" WHERE "id"=5"#, RoleId::Accountant)
            .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::denied(DenialReason::WriteOperation {
                keyword: "DELETE".to_string()
            })
        );
    }

    #[test]
    fn every_write_keyword_is_rejected() {
        let v = validator();
        for kw in [
            "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "TRUNCATE", "GRANT", "REVOKE",
        ] {
            let sql = format!(r#"{kw} something on "Project""#);
            let outcome = v.check(&sql, RoleId::Admin).unwrap();
            assert!(
                matches!(
                    outcome,
                    ValidationOutcome::Denied {
                        reason: DenialReason::WriteOperation { .. }
                    }
                ),
                "{kw} should be rejected"
            );
        }
    }

    #[test]
    fn write_keywords_match_case_insensitively() {
        let outcome = validator()
            .check("delete from \"Project\"", RoleId::Admin)
            .unwrap();
        assert!(!outcome.is_allowed());
    }

    #[test]
    fn keyword_as_substring_does_not_match() {
        // "created_at" contains CREATE but is not a whole-word match.
        let outcome = validator()
            .check(r#"SELECT "created_at" FROM "Project""#, RoleId::Admin)
            .unwrap();
        assert!(outcome.is_allowed());

        // "updated_by" contains UPDATE as a substring only.
        let outcome = validator()
            .check(r#"SELECT "updated_by" FROM "Project""#, RoleId::Admin)
            .unwrap();
        assert!(outcome.is_allowed());
    }

    #[test]
    fn allowed_tables_pass_for_every_role() {
        let registry = Arc::new(RoleRegistry::default());
        let v = QueryValidator::new(Arc::clone(&registry)).unwrap();

        for role in RoleId::ALL {
            for table in registry.tables_for(role).unwrap() {
                let sql = format!(r#"SELECT * FROM "{table}" LIMIT 1"#);
                let outcome = v.check(&sql, role).unwrap();
                assert!(outcome.is_allowed(), "{role} should read {table}");
            }
        }
    }

    #[test]
    fn blocked_table_rejected_even_next_to_allowed_ones() {
        let outcome = validator()
            .check(
                r#"SELECT * FROM "Project" JOIN "Billing" ON "Billing"."project_id" = "Project"."id""#,
                RoleId::Encoder,
            )
            .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::denied(DenialReason::TableAccess {
                table: "Billing".to_string()
            })
        );
    }

    #[test]
    fn unquoted_blocked_table_is_caught() {
        let outcome = validator()
            .check("SELECT * FROM CashFlow", RoleId::Encoder)
            .unwrap();
        assert!(!outcome.is_allowed());
    }

    #[test]
    fn blocked_table_matches_case_insensitively() {
        let outcome = validator()
            .check(r#"select * from "cashflow""#, RoleId::Encoder)
            .unwrap();
        assert!(!outcome.is_allowed());
    }

    #[test]
    fn check_is_idempotent() {
        let v = validator();
        let sql = r#"SELECT * FROM "CashFlow""#;
        let first = v.check(sql, RoleId::Encoder).unwrap();
        for _ in 0..10 {
            assert_eq!(v.check(sql, RoleId::Encoder).unwrap(), first);
        }
    }

    #[test]
    fn keyword_case_does_not_change_outcome() {
        let v = validator();
        let lower = v.check(r#"select * from "Project""#, RoleId::Encoder).unwrap();
        let upper = v.check(r#"SELECT * FROM "Project""#, RoleId::Encoder).unwrap();
        assert_eq!(lower, upper);
        assert!(lower.is_allowed());
    }
}
