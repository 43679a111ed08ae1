//! Validation utilities

use std::collections::{HashMap, HashSet};

use crate::accounts::AccountConfig;
use crate::types::*;

/// Validate that an account code is registered (non-zero)
pub fn validate_account_code(name: &str, code: AccountCode) -> ReconcileResult<()> {
    if code == 0 {
        return Err(ReconcileError::Config(format!(
            "Account code for '{}' cannot be zero",
            name
        )));
    }
    Ok(())
}

/// Validate that a supplier or customer name is usable as a lookup key
pub fn validate_party_name(name: &str) -> ReconcileResult<()> {
    if name.trim().is_empty() {
        return Err(ReconcileError::Config(
            "Supplier and customer names cannot be empty".to_string(),
        ));
    }

    if name.len() > 200 {
        return Err(ReconcileError::Config(format!(
            "Name '{}...' exceeds 200 characters",
            name.chars().take(20).collect::<String>()
        )));
    }

    Ok(())
}

fn validate_table(table: &HashMap<String, AccountCode>) -> ReconcileResult<()> {
    let mut seen = HashSet::with_capacity(table.len());
    for (name, code) in table {
        validate_party_name(name)?;
        validate_account_code(name, *code)?;
        if !seen.insert(name.trim()) {
            return Err(ReconcileError::Config(format!(
                "'{}' is registered more than once",
                name.trim()
            )));
        }
    }
    Ok(())
}

/// Validate the name tables of a chart of accounts
///
/// Missing fixed accounts are not reported here; a run rejects them with
/// `AmbiguousConfig` before matching starts.
pub fn validate_config(config: &AccountConfig) -> ReconcileResult<()> {
    validate_table(&config.suppliers)?;
    validate_table(&config.customers)?;
    Ok(())
}

/// Check the length and both check digits of a CNPJ
pub fn is_valid_cnpj(tax_id: &TaxId) -> bool {
    let digits: Vec<u32> = tax_id
        .as_str()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 14 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check_digit = |body: &[u32]| {
        let weights = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
        let offset = weights.len() - body.len();
        let sum: u32 = body
            .iter()
            .zip(&weights[offset..])
            .map(|(digit, weight)| digit * weight)
            .sum();
        match sum % 11 {
            0 | 1 => 0,
            rest => 11 - rest,
        }
    };

    check_digit(&digits[..12]) == digits[12] && check_digit(&digits[..13]) == digits[13]
}
