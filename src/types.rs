//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Numeric account or history code of the receiving bookkeeping system
pub type AccountCode = u32;

/// Direction of a bank movement as seen from the entity's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Money entering the account (deposit, receipt)
    Credit,
    /// Money leaving the account (payment, withdrawal)
    Debit,
}

impl Direction {
    /// Marker letter used by bank statements (`C` or `D`)
    pub fn marker(&self) -> char {
        match self {
            Direction::Credit => 'C',
            Direction::Debit => 'D',
        }
    }
}

/// One parsed spreadsheet row, keyed by column header
///
/// Cells are kept as text; the normalizer turns them into typed records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell value, returning the row for chaining
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a cell value
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into().trim().to_string(), value.into());
    }

    /// Get the first cell present under any of the given column names
    pub fn get_any(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .find_map(|column| self.cells.get(*column))
            .map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// A bank statement movement after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Date the movement was booked
    pub date: NaiveDate,
    /// Statement description (also the customer key for deposits)
    pub description: String,
    /// Absolute amount; never negative
    pub amount: BigDecimal,
    /// Whether money entered or left the account
    pub direction: Direction,
}

impl BankTransaction {
    /// Outflows are the only movements matched against the ledger
    pub fn is_outflow(&self) -> bool {
        self.direction == Direction::Debit
    }

    /// Amount with the statement sign convention applied (debits negative)
    pub fn signed_amount(&self) -> BigDecimal {
        match self.direction {
            Direction::Credit => self.amount.clone(),
            Direction::Debit => -self.amount.clone(),
        }
    }
}

/// A payable entry from the ledger sheet after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub payment_date: NaiveDate,
    pub supplier_name: String,
    pub invoice_number: String,
    pub gross_amount: BigDecimal,
    pub discount: BigDecimal,
    pub late_fee_and_interest: BigDecimal,
    /// Comparison key for matching against bank outflows
    pub net_amount_to_pay: BigDecimal,
    pub bank_fee: BigDecimal,
}

impl LedgerEntry {
    /// Complement text shared by every line of this entry's lot
    pub fn complement(&self) -> String {
        format!("{} {}", self.invoice_number, self.supplier_name)
            .trim()
            .to_string()
    }
}

/// Fixed codes every chart of accounts must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedCode {
    Cash,
    BankPayment,
    Discount,
    FineInterest,
    Fee,
    HistoryReconciled,
    HistoryCash,
    HistoryDeposit,
}

impl FixedCode {
    /// Account codes checked before a run starts
    pub const REQUIRED_ACCOUNTS: [FixedCode; 5] = [
        FixedCode::Cash,
        FixedCode::BankPayment,
        FixedCode::Discount,
        FixedCode::FineInterest,
        FixedCode::Fee,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FixedCode::Cash => "cash",
            FixedCode::BankPayment => "bank/payment",
            FixedCode::Discount => "discount",
            FixedCode::FineInterest => "fine/interest",
            FixedCode::Fee => "fee",
            FixedCode::HistoryReconciled => "history (reconciled)",
            FixedCode::HistoryCash => "history (cash)",
            FixedCode::HistoryDeposit => "history (deposit)",
        }
    }
}

impl fmt::Display for FixedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What kind of lookup failed when an account could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupKind {
    Supplier,
    Customer,
    Fixed(FixedCode),
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Supplier => f.write_str("supplier"),
            LookupKind::Customer => f.write_str("customer"),
            LookupKind::Fixed(code) => write!(f, "{} account", code),
        }
    }
}

/// Which input sequence a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowSource {
    Bank,
    Ledger,
}

impl fmt::Display for RowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSource::Bank => f.write_str("bank"),
            RowSource::Ledger => f.write_str("ledger"),
        }
    }
}

/// Position of a line inside its lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotMarker {
    /// First line; opens the lot
    Start,
    /// Any later line of the same lot
    Continuation,
}

/// One line of the accounting output before it is placed in a lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraft {
    pub date: NaiveDate,
    pub debit_account: Option<AccountCode>,
    pub credit_account: Option<AccountCode>,
    pub value: BigDecimal,
    pub history_code: AccountCode,
    pub complement: String,
}

impl LineDraft {
    /// Attach the lot position, producing a final accounting line
    pub fn into_line(self, lot: LotMarker) -> AccountingLine {
        AccountingLine {
            date: self.date,
            debit_account: self.debit_account,
            credit_account: self.credit_account,
            value: self.value,
            history_code: self.history_code,
            complement: self.complement,
            lot,
        }
    }
}

/// One row of the exported accounting file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingLine {
    pub date: NaiveDate,
    /// Account debited; `None` on credit-only ancillary lines
    pub debit_account: Option<AccountCode>,
    /// Account credited; `None` on debit-only ancillary lines
    pub credit_account: Option<AccountCode>,
    pub value: BigDecimal,
    pub history_code: AccountCode,
    pub complement: String,
    pub lot: LotMarker,
}

impl AccountingLine {
    pub fn starts_lot(&self) -> bool {
        self.lot == LotMarker::Start
    }
}

/// Per-category counts of a run, for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    /// Ledger entries paired with a bank outflow
    pub matched: usize,
    /// Ledger entries with no bank movement, booked against cash
    pub cash_paid: usize,
    /// Bank inflows
    pub deposits: usize,
    /// Bank outflows with no ledger entry
    pub withdrawals: usize,
}

impl SummaryCounts {
    /// Number of lots the run produced
    pub fn total(&self) -> usize {
        self.matched + self.cash_paid + self.deposits + self.withdrawals
    }
}

/// Tax ID (CNPJ) selecting which chart of accounts applies
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaxId(String);

impl TaxId {
    /// Parse a tax ID, accepting the punctuated form (`12.345.678/0001-95`)
    pub fn parse(raw: &str) -> ReconcileResult<Self> {
        let digits: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | '/' | '-' | ' '))
            .collect();

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReconcileError::InvalidTaxId(raw.to_string()));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur during a reconciliation run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    #[error("Malformed {origin} row {row}: field '{field}' {reason}")]
    MalformedRow {
        origin: RowSource,
        row: usize,
        field: String,
        reason: String,
    },
    #[error("Unknown {kind}: '{name}' has no account code")]
    UnknownAccount { name: String, kind: LookupKind },
    #[error("Chart of accounts has no {kind} account code")]
    AmbiguousConfig { kind: FixedCode },
    #[error("Invalid tax ID: '{0}'")]
    InvalidTaxId(String),
    #[error("No chart of accounts registered for tax ID {0}")]
    ConfigNotFound(TaxId),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;
