//! Account resolution over a borrowed chart of accounts

use std::collections::HashMap;

use crate::accounts::AccountConfig;
use crate::traits::ChartOfAccounts;
use crate::types::*;

/// Read-only resolver over one entity's [`AccountConfig`]
#[derive(Debug, Clone, Copy)]
pub struct AccountResolver<'a> {
    config: &'a AccountConfig,
}

impl<'a> AccountResolver<'a> {
    /// Create a resolver borrowing the given configuration
    pub fn new(config: &'a AccountConfig) -> Self {
        Self { config }
    }

    /// Fail with `AmbiguousConfig` unless every fixed account is registered
    pub fn check_fixed_codes(&self) -> ReconcileResult<()> {
        for kind in FixedCode::REQUIRED_ACCOUNTS {
            if self.config.fixed(kind).is_none() {
                return Err(ReconcileError::AmbiguousConfig { kind });
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &'a AccountConfig {
        self.config
    }
}

/// Zero codes count as unregistered. Untrimmed keys resolve to the
/// lexicographically smallest match.
fn lookup(table: &HashMap<String, AccountCode>, name: &str) -> Option<AccountCode> {
    let name = name.trim();
    table
        .get(name)
        .copied()
        .or_else(|| {
            table
                .iter()
                .filter(|(key, _)| key.trim() == name)
                .min_by(|a, b| a.0.cmp(b.0))
                .map(|(_, code)| *code)
        })
        .filter(|code| *code != 0)
}

impl ChartOfAccounts for AccountResolver<'_> {
    fn resolve_supplier(&self, name: &str) -> ReconcileResult<AccountCode> {
        lookup(&self.config.suppliers, name).ok_or_else(|| ReconcileError::UnknownAccount {
            name: name.trim().to_string(),
            kind: LookupKind::Supplier,
        })
    }

    fn resolve_customer(&self, name: &str) -> ReconcileResult<AccountCode> {
        lookup(&self.config.customers, name).ok_or_else(|| ReconcileError::UnknownAccount {
            name: name.trim().to_string(),
            kind: LookupKind::Customer,
        })
    }

    fn fixed_code(&self, kind: FixedCode) -> ReconcileResult<AccountCode> {
        self.config
            .fixed(kind)
            .ok_or_else(|| ReconcileError::UnknownAccount {
                name: kind.label().to_string(),
                kind: LookupKind::Fixed(kind),
            })
    }
}
