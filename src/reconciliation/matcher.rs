//! Pairing of bank outflows with ledger entries
//!
//! Entries and outflows are keyed by `(date, amount)` with exact decimal
//! equality. Within a key, the i-th ledger entry in sheet order pairs with the
//! i-th bank outflow in statement order; whatever is left over on either side
//! stays unmatched.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use crate::types::*;

/// Outcome of matching for one source transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchResult<'a> {
    /// A bank outflow paired with the ledger entry it paid
    Matched {
        bank: &'a BankTransaction,
        ledger: &'a LedgerEntry,
    },
    /// A ledger entry with no bank outflow; assumed paid in cash
    CashPaid(&'a LedgerEntry),
    /// A bank inflow; never matched against the ledger
    Deposit(&'a BankTransaction),
    /// A bank outflow with no ledger entry
    Withdrawal(&'a BankTransaction),
}

/// Matching output partitioned by category, each in original relative order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchOutcome<'a> {
    pub matched: Vec<(&'a BankTransaction, &'a LedgerEntry)>,
    pub unmatched_ledger: Vec<&'a LedgerEntry>,
    pub unmatched_bank_outflow: Vec<&'a BankTransaction>,
    pub bank_inflow: Vec<&'a BankTransaction>,
}

impl<'a> MatchOutcome<'a> {
    /// Flatten into report order: matched, cash-paid, deposits, withdrawals
    pub fn results(&self) -> Vec<MatchResult<'a>> {
        let matched = self
            .matched
            .iter()
            .map(|&(bank, ledger)| MatchResult::Matched { bank, ledger });
        let cash = self.unmatched_ledger.iter().map(|&e| MatchResult::CashPaid(e));
        let deposits = self.bank_inflow.iter().map(|&t| MatchResult::Deposit(t));
        let withdrawals = self
            .unmatched_bank_outflow
            .iter()
            .map(|&t| MatchResult::Withdrawal(t));

        matched.chain(cash).chain(deposits).chain(withdrawals).collect()
    }

    pub fn summary(&self) -> SummaryCounts {
        SummaryCounts {
            matched: self.matched.len(),
            cash_paid: self.unmatched_ledger.len(),
            deposits: self.bank_inflow.len(),
            withdrawals: self.unmatched_bank_outflow.len(),
        }
    }
}

type MatchKey = (NaiveDate, BigDecimal);

/// Match bank outflows against ledger entries
///
/// Both inputs must be in their original order; that order is the only
/// tie-break between entries sharing a date and amount.
pub fn match_transactions<'a>(
    bank: &'a [BankTransaction],
    ledger: &'a [LedgerEntry],
) -> MatchOutcome<'a> {
    // BigDecimal ordering is numeric, so 1000.0 and 1000.00 share a key
    let mut open_entries: BTreeMap<MatchKey, VecDeque<usize>> = BTreeMap::new();
    for (index, entry) in ledger.iter().enumerate() {
        open_entries
            .entry((entry.payment_date, entry.net_amount_to_pay.clone()))
            .or_default()
            .push_back(index);
    }

    let mut consumed = vec![false; ledger.len()];
    let mut outcome = MatchOutcome::default();

    for tx in bank {
        if !tx.is_outflow() {
            outcome.bank_inflow.push(tx);
            continue;
        }

        let next_entry = open_entries
            .get_mut(&(tx.date, tx.amount.clone()))
            .and_then(VecDeque::pop_front);

        match next_entry {
            Some(index) => {
                consumed[index] = true;
                outcome.matched.push((tx, &ledger[index]));
            }
            None => outcome.unmatched_bank_outflow.push(tx),
        }
    }

    outcome.unmatched_ledger = ledger
        .iter()
        .zip(&consumed)
        .filter(|(_, &used)| !used)
        .map(|(entry, _)| entry)
        .collect();

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn bank(day: u32, amount: &str, direction: Direction) -> BankTransaction {
        BankTransaction {
            date: date(day),
            description: format!("MOV {}", amount),
            amount: BigDecimal::from_str(amount).unwrap(),
            direction,
        }
    }

    fn entry(day: u32, amount: &str, supplier: &str) -> LedgerEntry {
        let amount = BigDecimal::from_str(amount).unwrap();
        LedgerEntry {
            payment_date: date(day),
            supplier_name: supplier.to_string(),
            invoice_number: String::new(),
            gross_amount: amount.clone(),
            discount: BigDecimal::from(0),
            late_fee_and_interest: BigDecimal::from(0),
            net_amount_to_pay: amount,
            bank_fee: BigDecimal::from(0),
        }
    }

    #[test]
    fn test_exact_date_and_amount_match() {
        let bank = vec![bank(5, "1000.00", Direction::Debit)];
        let ledger = vec![entry(5, "1000", "ACME")];

        let outcome = match_transactions(&bank, &ledger);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].1.supplier_name, "ACME");
        assert!(outcome.unmatched_ledger.is_empty());
        assert!(outcome.unmatched_bank_outflow.is_empty());
    }

    #[test]
    fn test_no_tolerance_on_amount_or_date() {
        let bank = vec![
            bank(5, "1000.01", Direction::Debit),
            bank(6, "1000.00", Direction::Debit),
        ];
        let ledger = vec![entry(5, "1000.00", "ACME")];

        let outcome = match_transactions(&bank, &ledger);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched_ledger.len(), 1);
        assert_eq!(outcome.unmatched_bank_outflow.len(), 2);
    }

    #[test]
    fn test_ties_pair_positionally_in_input_order() {
        let bank = vec![
            bank(5, "1000.00", Direction::Debit),
            bank(5, "1000.00", Direction::Debit),
        ];
        let ledger = vec![
            entry(5, "1000.00", "A"),
            entry(5, "1000.00", "B"),
            entry(5, "1000.00", "C"),
        ];

        let outcome = match_transactions(&bank, &ledger);
        assert!(std::ptr::eq(outcome.matched[0].0, &bank[0]));
        assert_eq!(outcome.matched[0].1.supplier_name, "A");
        assert!(std::ptr::eq(outcome.matched[1].0, &bank[1]));
        assert_eq!(outcome.matched[1].1.supplier_name, "B");
        assert_eq!(outcome.unmatched_ledger.len(), 1);
        assert_eq!(outcome.unmatched_ledger[0].supplier_name, "C");
    }

    #[test]
    fn test_inflows_are_never_matched() {
        let bank = vec![bank(5, "1000.00", Direction::Credit)];
        let ledger = vec![entry(5, "1000.00", "ACME")];

        let outcome = match_transactions(&bank, &ledger);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.bank_inflow.len(), 1);
        assert_eq!(outcome.unmatched_ledger.len(), 1);
    }

    #[test]
    fn test_each_entry_consumed_at_most_once() {
        let bank = vec![
            bank(5, "10.00", Direction::Debit),
            bank(5, "10.00", Direction::Debit),
            bank(5, "10.00", Direction::Debit),
        ];
        let ledger = vec![entry(5, "10.00", "ACME")];

        let outcome = match_transactions(&bank, &ledger);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.unmatched_bank_outflow.len(), 2);
        assert!(std::ptr::eq(outcome.unmatched_bank_outflow[0], &bank[1]));
    }

    #[test]
    fn test_results_follow_report_order() {
        let bank = vec![
            bank(1, "5.00", Direction::Debit),
            bank(2, "7.00", Direction::Credit),
            bank(3, "9.00", Direction::Debit),
        ];
        let ledger = vec![entry(4, "1.00", "CASH"), entry(3, "9.00", "ACME")];

        let outcome = match_transactions(&bank, &ledger);
        let results = outcome.results();
        assert!(matches!(results[0], MatchResult::Matched { .. }));
        assert!(matches!(results[1], MatchResult::CashPaid(e) if e.supplier_name == "CASH"));
        assert!(matches!(results[2], MatchResult::Deposit(_)));
        assert!(matches!(results[3], MatchResult::Withdrawal(t) if t.date == date(1)));

        let summary = outcome.summary();
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.cash_paid, 1);
        assert_eq!(summary.deposits, 1);
        assert_eq!(summary.withdrawals, 1);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let bank = vec![
            bank(5, "10.00", Direction::Debit),
            bank(5, "20.00", Direction::Debit),
            bank(6, "10.00", Direction::Credit),
        ];
        let ledger = vec![entry(5, "20.00", "B"), entry(5, "10.00", "A")];

        let first = match_transactions(&bank, &ledger);
        let second = match_transactions(&bank, &ledger);
        assert_eq!(first, second);
    }
}
