//! Per-entity chart of accounts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Cash account used when a chart of accounts does not name one
pub const DEFAULT_CASH_ACCOUNT: AccountCode = 5;
/// Bank fee account used when a chart of accounts does not name one
pub const DEFAULT_FEE_ACCOUNT: AccountCode = 316;

/// History codes tagging the accounting nature of each line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryCodes {
    /// Payments reconciled against the bank, and every ancillary line
    pub reconciled: AccountCode,
    /// Payments made in cash
    pub cash: AccountCode,
    /// Deposits and receipts
    pub deposit: AccountCode,
}

impl Default for HistoryCodes {
    fn default() -> Self {
        Self {
            reconciled: 34,
            cash: 1,
            deposit: 9,
        }
    }
}

/// Chart of accounts for one legal entity
///
/// Loaded once per run and never mutated by the reconciliation core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub suppliers: HashMap<String, AccountCode>,
    pub customers: HashMap<String, AccountCode>,
    pub cash_account: Option<AccountCode>,
    pub bank_account: Option<AccountCode>,
    pub discount_account: Option<AccountCode>,
    pub fine_interest_account: Option<AccountCode>,
    pub fee_account: Option<AccountCode>,
    pub history: HistoryCodes,
}

impl AccountConfig {
    /// Create an empty chart of accounts with the standard history codes
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a supplier account
    pub fn with_supplier(mut self, name: impl Into<String>, code: AccountCode) -> Self {
        self.suppliers.insert(name.into(), code);
        self
    }

    /// Register a customer account
    pub fn with_customer(mut self, name: impl Into<String>, code: AccountCode) -> Self {
        self.customers.insert(name.into(), code);
        self
    }

    /// Set one of the fixed codes
    pub fn with_fixed(mut self, kind: FixedCode, code: AccountCode) -> Self {
        match kind {
            FixedCode::Cash => self.cash_account = Some(code),
            FixedCode::BankPayment => self.bank_account = Some(code),
            FixedCode::Discount => self.discount_account = Some(code),
            FixedCode::FineInterest => self.fine_interest_account = Some(code),
            FixedCode::Fee => self.fee_account = Some(code),
            FixedCode::HistoryReconciled => self.history.reconciled = code,
            FixedCode::HistoryCash => self.history.cash = code,
            FixedCode::HistoryDeposit => self.history.deposit = code,
        }
        self
    }

    /// Look up a fixed code, `None` when it is not registered
    pub fn fixed(&self, kind: FixedCode) -> Option<AccountCode> {
        match kind {
            FixedCode::Cash => self.cash_account,
            FixedCode::BankPayment => self.bank_account,
            FixedCode::Discount => self.discount_account,
            FixedCode::FineInterest => self.fine_interest_account,
            FixedCode::Fee => self.fee_account,
            FixedCode::HistoryReconciled => Some(self.history.reconciled),
            FixedCode::HistoryCash => Some(self.history.cash),
            FixedCode::HistoryDeposit => Some(self.history.deposit),
        }
    }

    /// Parse a chart of accounts from the per-entity JSON file
    ///
    /// The file lists `fornecedores` and `clientes` by name, the bank accounts
    /// under `contas_pagamento` (the first one is used for payments) and the
    /// special accounts `multas_juros`, `descontos`, `tarifas` and `caixa`.
    /// A code of zero marks an account that was never registered.
    pub fn from_json(json: &str) -> ReconcileResult<Self> {
        let file: ChartFile =
            serde_json::from_str(json).map_err(|e| ReconcileError::Config(e.to_string()))?;

        let bank_account = match file.contas_pagamento.values().next() {
            Some(value) => Some(code_from_value("contas_pagamento", value)?),
            None => None,
        };

        Ok(Self {
            suppliers: party_table("fornecedores", file.fornecedores)?,
            customers: party_table("clientes", file.clientes)?,
            cash_account: registered(file.caixa),
            bank_account: bank_account.and_then(registered),
            discount_account: registered(file.descontos),
            fine_interest_account: registered(file.multas_juros),
            fee_account: registered(file.tarifas),
            history: HistoryCodes::default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChartFile {
    #[serde(default)]
    fornecedores: HashMap<String, AccountCode>,
    #[serde(default)]
    clientes: HashMap<String, AccountCode>,
    #[serde(default)]
    contas_pagamento: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    multas_juros: AccountCode,
    #[serde(default)]
    descontos: AccountCode,
    #[serde(default = "default_fee")]
    tarifas: AccountCode,
    #[serde(default = "default_cash")]
    caixa: AccountCode,
}

fn default_fee() -> AccountCode {
    DEFAULT_FEE_ACCOUNT
}

fn default_cash() -> AccountCode {
    DEFAULT_CASH_ACCOUNT
}

fn registered(code: AccountCode) -> Option<AccountCode> {
    (code != 0).then_some(code)
}

/// Trim names and drop unregistered (zero) codes from a name table
fn party_table(
    field: &str,
    entries: HashMap<String, AccountCode>,
) -> ReconcileResult<HashMap<String, AccountCode>> {
    let mut table = HashMap::with_capacity(entries.len());
    for (name, code) in entries {
        if code == 0 {
            continue;
        }
        let name = name.trim().to_string();
        match table.insert(name.clone(), code) {
            Some(other) if other != code => {
                return Err(ReconcileError::Config(format!(
                    "'{}' lists '{}' twice with codes {} and {}",
                    field, name, other, code
                )));
            }
            _ => {}
        }
    }
    Ok(table)
}

fn code_from_value(field: &str, value: &serde_json::Value) -> ReconcileResult<AccountCode> {
    value
        .as_u64()
        .and_then(|code| AccountCode::try_from(code).ok())
        .ok_or_else(|| {
            ReconcileError::Config(format!(
                "'{}' holds a non-numeric account code: {}",
                field, value
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_reads_original_layout() {
        let json = r#"{
            "fornecedores": {"ACME": 10, "Distribuidora Sul": 11},
            "clientes": {"PIX RECEBIDO - OUTRA IF": 5},
            "contas_pagamento": {"Banco do Brasil": 7, "Caixa Economica": 8},
            "multas_juros": 50,
            "descontos": 60,
            "tarifas": 316
        }"#;

        let config = AccountConfig::from_json(json).unwrap();
        assert_eq!(config.suppliers["ACME"], 10);
        assert_eq!(config.customers["PIX RECEBIDO - OUTRA IF"], 5);
        assert_eq!(config.bank_account, Some(7));
        assert_eq!(config.fine_interest_account, Some(50));
        assert_eq!(config.discount_account, Some(60));
        assert_eq!(config.fee_account, Some(316));
        assert_eq!(config.cash_account, Some(DEFAULT_CASH_ACCOUNT));
        assert_eq!(config.history, HistoryCodes::default());
    }

    #[test]
    fn test_bank_account_is_first_in_document_order() {
        let json = r#"{"contas_pagamento": {"Zeta": 9, "Alfa": 3}}"#;
        let config = AccountConfig::from_json(json).unwrap();
        assert_eq!(config.bank_account, Some(9));
    }

    #[test]
    fn test_zero_codes_are_unregistered() {
        let json = r#"{
            "fornecedores": {},
            "contas_pagamento": {},
            "multas_juros": 0,
            "tarifas": 0,
            "descontos": 0
        }"#;

        let config = AccountConfig::from_json(json).unwrap();
        assert_eq!(config.bank_account, None);
        assert_eq!(config.fine_interest_account, None);
        assert_eq!(config.discount_account, None);
        assert_eq!(config.fee_account, None);
    }

    #[test]
    fn test_zero_coded_parties_are_dropped() {
        let json = r#"{
            "fornecedores": {"ACME": 0, " Globex ": 12},
            "clientes": {"PIX RECEBIDO": 0}
        }"#;

        let config = AccountConfig::from_json(json).unwrap();
        assert!(!config.suppliers.contains_key("ACME"));
        assert_eq!(config.suppliers["Globex"], 12);
        assert!(config.customers.is_empty());
    }

    #[test]
    fn test_conflicting_trimmed_names_are_rejected() {
        let json = r#"{"fornecedores": {"ACME ": 10, " ACME": 11}}"#;
        let result = AccountConfig::from_json(json);
        assert!(matches!(result, Err(ReconcileError::Config(_))));

        let json = r#"{"fornecedores": {"ACME ": 10, " ACME": 10}}"#;
        let config = AccountConfig::from_json(json).unwrap();
        assert_eq!(config.suppliers["ACME"], 10);
    }

    #[test]
    fn test_missing_fee_falls_back_to_default() {
        let config = AccountConfig::from_json("{}").unwrap();
        assert_eq!(config.fee_account, Some(DEFAULT_FEE_ACCOUNT));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = AccountConfig::from_json(r#"{"contas_pagamento": {"Banco": "sete"}}"#);
        assert!(matches!(result, Err(ReconcileError::Config(_))));

        let result = AccountConfig::from_json("not json");
        assert!(matches!(result, Err(ReconcileError::Config(_))));
    }

    #[test]
    fn test_with_fixed_sets_history_codes() {
        let config = AccountConfig::new()
            .with_fixed(FixedCode::HistoryCash, 2)
            .with_fixed(FixedCode::Cash, 5);
        assert_eq!(config.fixed(FixedCode::HistoryCash), Some(2));
        assert_eq!(config.fixed(FixedCode::Cash), Some(5));
        assert_eq!(config.fixed(FixedCode::Fee), None);
    }
}
