// SPDX-License-Identifier: Apache-2.0

//! Role registry
//!
//! Static role → allowed-table mapping, the single source of truth for
//! table-level authorization. The registry is built once at startup and
//! never mutated afterward; blocked-table sets are derived on demand from
//! the union of all roles' tables.

pub mod messages;

pub use messages::DenialMessages;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the role registry.
///
/// `UnknownRole` should never occur if upstream authentication enforces
/// valid roles; treat it as a programming error and fail fast.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("role '{role}' is not authorized; allowed roles: ADMIN, ENCODER, ACCOUNTANT")]
    UnknownRole { role: String },

    #[error("role '{role}' registered with an empty table set")]
    EmptyTableSet { role: RoleId },
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A fixed identity class governing table-level access.
///
/// The set of roles is closed and fixed at compile time; the tables each
/// role may reference are configured in the [`RoleRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleId {
    Admin,
    Encoder,
    Accountant,
}

impl RoleId {
    /// All roles, in registry order.
    pub const ALL: [RoleId; 3] = [RoleId::Admin, RoleId::Encoder, RoleId::Accountant];

    /// Canonical uppercase name, matching what the authentication layer sends.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleId::Admin => "ADMIN",
            RoleId::Encoder => "ENCODER",
            RoleId::Accountant => "ACCOUNTANT",
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleId {
    type Err = RegistryError;

    /// Parses a role string, normalizing whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(RoleId::Admin),
            "ENCODER" => Ok(RoleId::Encoder),
            "ACCOUNTANT" => Ok(RoleId::Accountant),
            _ => Err(RegistryError::UnknownRole {
                role: s.to_string(),
            }),
        }
    }
}

/// Immutable role → allowed-table mapping.
///
/// Table names are case-sensitive exact tokens matching the underlying
/// schema's casing (some tables are lower-case, most are PascalCase; that
/// is schema-defined, not a normalization this layer makes).
pub struct RoleRegistry {
    tables: HashMap<RoleId, BTreeSet<String>>,
    universe: BTreeSet<String>,
}

impl RoleRegistry {
    /// Starts building a custom registry.
    pub fn builder() -> RoleRegistryBuilder {
        RoleRegistryBuilder::new()
    }

    /// Tables the role may reference.
    pub fn tables_for(&self, role: RoleId) -> RegistryResult<&BTreeSet<String>> {
        self.tables
            .get(&role)
            .ok_or_else(|| RegistryError::UnknownRole {
                role: role.to_string(),
            })
    }

    /// Tables the role may NOT reference: the universe minus its allow-list.
    ///
    /// Empty for a full-access role.
    pub fn blocked_tables_for(&self, role: RoleId) -> RegistryResult<BTreeSet<String>> {
        let allowed = self.tables_for(role)?;
        Ok(self.universe.difference(allowed).cloned().collect())
    }

    /// The union of all roles' tables: every table known to the gateway.
    pub fn universe(&self) -> &BTreeSet<String> {
        &self.universe
    }

    /// Whether the role is present in this registry.
    pub fn contains(&self, role: RoleId) -> bool {
        self.tables.contains_key(&role)
    }

    /// Roles registered, sorted.
    pub fn roles(&self) -> Vec<RoleId> {
        let mut roles: Vec<RoleId> = self.tables.keys().copied().collect();
        roles.sort();
        roles
    }
}

impl Default for RoleRegistry {
    /// The production mapping: ADMIN sees everything, ENCODER is cut off
    /// from cash flow and billing, ACCOUNTANT from fleet and product data.
    fn default() -> Self {
        RoleRegistryBuilder::new()
            .role(
                RoleId::Admin,
                [
                    "Project",
                    "Trip",
                    "TruckDetails",
                    "Expenses",
                    "CashFlow",
                    "product_category",
                    "product",
                    "Quotation",
                    "QuotationItem",
                    "ExpensesTableTemplate",
                    "ExpensesColumn",
                    "ExpensesCellValue",
                    "CashFlowCustomTable",
                    "CashFlowColumn",
                    "CashFlowCellValue",
                    "Billing",
                ],
            )
            .role(
                RoleId::Encoder,
                [
                    "Project",
                    "Expenses",
                    "ExpensesTableTemplate",
                    "ExpensesColumn",
                    "ExpensesCellValue",
                    "Quotation",
                    "QuotationItem",
                    "Trip",
                    "TruckDetails",
                    "product",
                    "product_category",
                ],
            )
            .role(
                RoleId::Accountant,
                [
                    "Project",
                    "Expenses",
                    "ExpensesTableTemplate",
                    "ExpensesColumn",
                    "ExpensesCellValue",
                    "CashFlow",
                    "CashFlowCustomTable",
                    "CashFlowColumn",
                    "CashFlowCellValue",
                    "Quotation",
                    "QuotationItem",
                    "Billing",
                ],
            )
            .build()
            .unwrap_or_else(|e| unreachable!("default registry is valid: {e}"))
    }
}

/// Builder for [`RoleRegistry`]. Register roles, then `build()`; the
/// resulting registry is immutable.
#[derive(Default)]
pub struct RoleRegistryBuilder {
    tables: HashMap<RoleId, BTreeSet<String>>,
}

impl RoleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a role's allow-list.
    pub fn role<I, S>(mut self, role: RoleId, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = tables.into_iter().map(Into::into).collect();
        self.tables.insert(role, set);
        self
    }

    /// Finalizes the registry. Every registered role must have at least
    /// one table.
    pub fn build(self) -> RegistryResult<RoleRegistry> {
        for (role, tables) in &self.tables {
            if tables.is_empty() {
                return Err(RegistryError::EmptyTableSet { role: *role });
            }
        }

        let universe: BTreeSet<String> = self
            .tables
            .values()
            .flat_map(|tables| tables.iter().cloned())
            .collect();

        Ok(RoleRegistry {
            tables: self.tables,
            universe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_normalizes_case_and_whitespace() {
        assert_eq!("  encoder ".parse::<RoleId>().unwrap(), RoleId::Encoder);
        assert_eq!("Admin".parse::<RoleId>().unwrap(), RoleId::Admin);
        assert_eq!("ACCOUNTANT".parse::<RoleId>().unwrap(), RoleId::Accountant);
    }

    #[test]
    fn parse_unknown_role_fails() {
        let err = "DISPATCHER".parse::<RoleId>().unwrap_err();
        assert!(matches!(err, RegistryError::UnknownRole { .. }));
    }

    #[test]
    fn default_registry_has_all_roles_with_tables() {
        let registry = RoleRegistry::default();
        for role in RoleId::ALL {
            let tables = registry.tables_for(role).unwrap();
            assert!(!tables.is_empty(), "{role} should have tables");
        }
    }

    #[test]
    fn admin_has_empty_blocked_set() {
        let registry = RoleRegistry::default();
        assert!(registry.blocked_tables_for(RoleId::Admin).unwrap().is_empty());
    }

    #[test]
    fn encoder_is_blocked_from_cash_flow_and_billing() {
        let registry = RoleRegistry::default();
        let blocked = registry.blocked_tables_for(RoleId::Encoder).unwrap();
        for table in [
            "CashFlow",
            "CashFlowCustomTable",
            "CashFlowColumn",
            "CashFlowCellValue",
            "Billing",
        ] {
            assert!(blocked.contains(table), "encoder should be blocked from {table}");
        }
        assert!(!blocked.contains("Project"));
    }

    #[test]
    fn accountant_is_blocked_from_fleet_and_products() {
        let registry = RoleRegistry::default();
        let blocked = registry.blocked_tables_for(RoleId::Accountant).unwrap();
        for table in ["Trip", "TruckDetails", "product", "product_category"] {
            assert!(blocked.contains(table));
        }
    }

    #[test]
    fn universe_is_union_of_role_tables() {
        let registry = RoleRegistry::default();
        // ADMIN sees everything, so the universe equals ADMIN's allow-list.
        assert_eq!(registry.universe(), registry.tables_for(RoleId::Admin).unwrap());
    }

    #[test]
    fn builder_rejects_empty_table_set() {
        let result = RoleRegistry::builder()
            .role(RoleId::Encoder, Vec::<String>::new())
            .build();
        assert!(matches!(result, Err(RegistryError::EmptyTableSet { .. })));
    }

    #[test]
    fn custom_registry_derives_blocked_tables() {
        let registry = RoleRegistry::builder()
            .role(RoleId::Admin, ["a", "b", "c"])
            .role(RoleId::Encoder, ["a"])
            .build()
            .unwrap();

        let blocked = registry.blocked_tables_for(RoleId::Encoder).unwrap();
        assert_eq!(blocked, BTreeSet::from(["b".to_string(), "c".to_string()]));
        assert!(!registry.contains(RoleId::Accountant));
        assert!(registry.tables_for(RoleId::Accountant).is_err());
    }
}
