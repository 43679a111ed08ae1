//! In-memory chart-of-accounts source for testing and embedding

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::accounts::AccountConfig;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_config;

/// In-memory configuration source keyed by tax ID
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    configs: Arc<RwLock<BTreeMap<TaxId, AccountConfig>>>,
}

impl MemoryConfigSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the chart of accounts of an entity
    pub fn insert(&self, tax_id: TaxId, config: AccountConfig) -> ReconcileResult<()> {
        validate_config(&config)?;
        self.configs
            .write()
            .map_err(|_| poisoned())?
            .insert(tax_id, config);
        Ok(())
    }

    /// Register an entity from its JSON chart-of-accounts file
    pub fn insert_json(&self, tax_id: TaxId, json: &str) -> ReconcileResult<()> {
        self.insert(tax_id, AccountConfig::from_json(json)?)
    }
}

fn poisoned() -> ReconcileError {
    ReconcileError::Config("configuration store lock poisoned".to_string())
}

#[async_trait]
impl AccountConfigSource for MemoryConfigSource {
    async fn load(&self, tax_id: &TaxId) -> ReconcileResult<AccountConfig> {
        self.configs
            .read()
            .map_err(|_| poisoned())?
            .get(tax_id)
            .cloned()
            .ok_or_else(|| ReconcileError::ConfigNotFound(tax_id.clone()))
    }

    async fn list_entities(&self) -> ReconcileResult<Vec<TaxId>> {
        Ok(self
            .configs
            .read()
            .map_err(|_| poisoned())?
            .keys()
            .cloned()
            .collect())
    }
}
