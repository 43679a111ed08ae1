//! Traits for chart-of-accounts lookup and configuration loading

use async_trait::async_trait;

use crate::accounts::AccountConfig;
use crate::types::*;

/// Read-only view over one entity's chart of accounts
///
/// Implementations must not mutate the underlying configuration; a single
/// resolver may be shared across concurrent runs.
pub trait ChartOfAccounts: Send + Sync {
    /// Resolve the account code of a supplier by name
    fn resolve_supplier(&self, name: &str) -> ReconcileResult<AccountCode>;

    /// Resolve the account code of a customer by name
    fn resolve_customer(&self, name: &str) -> ReconcileResult<AccountCode>;

    /// Resolve one of the fixed account or history codes
    fn fixed_code(&self, kind: FixedCode) -> ReconcileResult<AccountCode>;
}

/// Source of per-entity charts of accounts
///
/// This lets the reconciliation core work with any configuration backend
/// (JSON files, a database, a remote repository) by implementing these methods.
#[async_trait]
pub trait AccountConfigSource: Send + Sync {
    /// Load the chart of accounts registered for a tax ID
    async fn load(&self, tax_id: &TaxId) -> ReconcileResult<AccountConfig>;

    /// List the entities with a registered chart of accounts
    async fn list_entities(&self) -> ReconcileResult<Vec<TaxId>>;
}
