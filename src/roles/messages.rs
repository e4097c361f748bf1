// SPDX-License-Identifier: Apache-2.0

//! Denial messages
//!
//! Maps a blocked table + role to a human-readable explanation the calling
//! agent can relay to the end user. Presentation only; never consulted by
//! the validator.

use std::collections::HashMap;

use super::RoleId;

/// Role-specific denial message overrides with a generic fallback.
pub struct DenialMessages {
    overrides: HashMap<(RoleId, String), String>,
}

impl DenialMessages {
    /// Explains why `role` cannot access `table`.
    pub fn explain(&self, role: RoleId, table: &str) -> String {
        self.overrides
            .get(&(role, table.to_string()))
            .cloned()
            .unwrap_or_else(|| {
                format!(
                    "You don't have access to '{table}' data with your current role ({role})."
                )
            })
    }

    /// Explains a rejected write operation.
    pub fn explain_write(&self, keyword: &str) -> String {
        format!("Write operation '{keyword}' is not allowed. Only SELECT queries are permitted.")
    }

    /// Adds or replaces an override. Used by deployments with different
    /// org structures than the default.
    pub fn with_override(
        mut self,
        role: RoleId,
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.overrides.insert((role, table.into()), message.into());
        self
    }
}

impl Default for DenialMessages {
    fn default() -> Self {
        let mut overrides = HashMap::new();

        let encoder: [(&str, &str); 5] = [
            (
                "CashFlow",
                "Cash flow data is managed by the Accountant. Please contact your accountant for cash flow information.",
            ),
            ("CashFlowCustomTable", "Cash flow data is managed by the Accountant."),
            ("CashFlowColumn", "Cash flow data is managed by the Accountant."),
            ("CashFlowCellValue", "Cash flow data is managed by the Accountant."),
            (
                "Billing",
                "Billing records are managed by the Accountant. Please contact your accountant for billing information.",
            ),
        ];
        for (table, message) in encoder {
            overrides.insert((RoleId::Encoder, table.to_string()), message.to_string());
        }

        let accountant: [(&str, &str); 4] = [
            (
                "Trip",
                "Trip management is handled by the Dispatcher. Please contact your dispatcher for trip information.",
            ),
            ("TruckDetails", "Fleet management is handled by the Dispatcher and Admin."),
            ("product", "Product management is handled by the Admin."),
            ("product_category", "Product categories are managed by the Admin."),
        ];
        for (table, message) in accountant {
            overrides.insert((RoleId::Accountant, table.to_string()), message.to_string());
        }

        Self { overrides }
    }
}
