//! Reconciliation run orchestrating normalization, matching, classification and export

use serde::Serialize;
use tracing::{debug, field, info, info_span};
use uuid::Uuid;

use crate::accounts::{AccountConfig, AccountResolver};
use crate::export::CsvExporter;
use crate::options::ReconcileOptions;
use crate::reconciliation::classifier::classify;
use crate::reconciliation::lot::{build_lots, flatten_lots, Lot};
use crate::reconciliation::matcher::match_transactions;
use crate::reconciliation::normalizer::{normalize_bank_rows, normalize_ledger_rows};
use crate::traits::AccountConfigSource;
use crate::types::*;

/// Everything a single run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Identifies the run in log output
    pub run_id: Uuid,
    /// Export text in the bookkeeping import layout
    pub csv: String,
    /// Lots in report order
    pub lots: Vec<Lot>,
    pub summary: SummaryCounts,
}

impl Reconciliation {
    /// All accounting lines in report order
    pub fn lines(&self) -> Vec<AccountingLine> {
        flatten_lots(&self.lots)
    }
}

/// Runs reconciliations with a fixed set of options
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Reconcile bank rows against ledger rows for one entity
    pub fn run(
        &self,
        bank_rows: &[RawRow],
        ledger_rows: &[RawRow],
        config: &AccountConfig,
    ) -> ReconcileResult<Reconciliation> {
        self.run_traced(None, bank_rows, ledger_rows, config)
    }

    /// Load the entity's chart of accounts from a source, then run
    pub async fn run_for_entity<S: AccountConfigSource + ?Sized>(
        &self,
        source: &S,
        tax_id: &TaxId,
        bank_rows: &[RawRow],
        ledger_rows: &[RawRow],
    ) -> ReconcileResult<Reconciliation> {
        let config = source.load(tax_id).await?;
        self.run_traced(Some(tax_id), bank_rows, ledger_rows, &config)
    }

    fn run_traced(
        &self,
        tax_id: Option<&TaxId>,
        bank_rows: &[RawRow],
        ledger_rows: &[RawRow],
        config: &AccountConfig,
    ) -> ReconcileResult<Reconciliation> {
        let run_id = Uuid::new_v4();
        let span = info_span!("reconcile", %run_id, tax_id = field::Empty);
        if let Some(tax_id) = tax_id {
            span.record("tax_id", field::display(tax_id));
        }
        let _guard = span.enter();

        let resolver = AccountResolver::new(config);
        resolver.check_fixed_codes()?;

        let bank = normalize_bank_rows(bank_rows)?;
        let ledger = normalize_ledger_rows(ledger_rows)?;
        debug!(
            bank_transactions = bank.len(),
            ledger_entries = ledger.len(),
            "Normalized input rows"
        );

        let outcome = match_transactions(&bank, &ledger);
        let summary = outcome.summary();
        debug!(matched = summary.matched, "Matched bank outflows against ledger");

        let groups = classify(&outcome.results(), &resolver)?;
        let lots = build_lots(groups);
        let csv = CsvExporter::new(self.options).render(&flatten_lots(&lots))?;

        info!(
            matched = summary.matched,
            cash_paid = summary.cash_paid,
            deposits = summary.deposits,
            withdrawals = summary.withdrawals,
            lots = lots.len(),
            "Reconciliation completed"
        );

        Ok(Reconciliation {
            run_id,
            csv,
            lots,
            summary,
        })
    }
}

/// Reconcile with default options
pub fn reconcile(
    bank_rows: &[RawRow],
    ledger_rows: &[RawRow],
    config: &AccountConfig,
) -> ReconcileResult<Reconciliation> {
    Reconciler::default().run(bank_rows, ledger_rows, config)
}
