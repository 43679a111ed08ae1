//! Conversion of raw spreadsheet rows into typed transactions

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use std::str::FromStr;

use crate::types::*;

/// Column names for bank statement rows, English header first
pub mod bank_columns {
    pub const DATE: &[&str] = &["Date", "Data"];
    pub const DESCRIPTION: &[&str] = &["Description", "Histórico", "Historico"];
    pub const VALUE: &[&str] = &["Value", "Valor"];
}

/// Column names for ledger rows, English header first
pub mod ledger_columns {
    pub const PAYMENT_DATE: &[&str] = &["PaymentDate", "Data pagamento"];
    pub const SUPPLIER_NAME: &[&str] = &["SupplierName", "Nome do fornecedor"];
    pub const INVOICE_NUMBER: &[&str] = &["InvoiceNumber", "Nota fiscal"];
    pub const VALUE: &[&str] = &["Value", "Valor"];
    pub const DISCOUNTS: &[&str] = &["Discounts", "Descontos"];
    pub const LATE_FEE_AND_INTEREST: &[&str] = &["LateFeeAndInterest", "Multa e juros"];
    pub const VALUE_TO_PAY: &[&str] = &["ValueToPay", "Valor a pagar"];
    pub const BOLETO_FEES: &[&str] = &["BoletoFees", "Tarifas de Boleto"];
}

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Normalize bank statement rows, preserving input order
pub fn normalize_bank_rows(rows: &[RawRow]) -> ReconcileResult<Vec<BankTransaction>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_bank_row(index, row))
        .collect()
}

/// Normalize ledger rows, preserving input order
pub fn normalize_ledger_rows(rows: &[RawRow]) -> ReconcileResult<Vec<LedgerEntry>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_ledger_row(index, row))
        .collect()
}

fn normalize_bank_row(index: usize, row: &RawRow) -> ReconcileResult<BankTransaction> {
    let cells = RowReader::new(RowSource::Bank, index, row);

    let date = cells.date(bank_columns::DATE)?;
    let description = cells.text(bank_columns::DESCRIPTION)?.trim().to_string();
    let raw_value = cells.required(bank_columns::VALUE)?;
    let (amount, direction) = parse_statement_amount(raw_value)
        .ok_or_else(|| cells.malformed(bank_columns::VALUE, "is not a valid amount"))?;

    Ok(BankTransaction {
        date,
        description,
        amount,
        direction,
    })
}

fn normalize_ledger_row(index: usize, row: &RawRow) -> ReconcileResult<LedgerEntry> {
    let cells = RowReader::new(RowSource::Ledger, index, row);

    Ok(LedgerEntry {
        payment_date: cells.date(ledger_columns::PAYMENT_DATE)?,
        supplier_name: cells.required(ledger_columns::SUPPLIER_NAME)?.to_string(),
        invoice_number: cells.text(ledger_columns::INVOICE_NUMBER)?.trim().to_string(),
        gross_amount: cells.money(ledger_columns::VALUE)?,
        discount: cells.money(ledger_columns::DISCOUNTS)?,
        late_fee_and_interest: cells.money(ledger_columns::LATE_FEE_AND_INTEREST)?,
        net_amount_to_pay: cells.required_money(ledger_columns::VALUE_TO_PAY)?,
        bank_fee: cells.money(ledger_columns::BOLETO_FEES)?,
    })
}

/// Typed access to the cells of one row, producing `MalformedRow` errors
struct RowReader<'a> {
    origin: RowSource,
    index: usize,
    row: &'a RawRow,
}

impl<'a> RowReader<'a> {
    fn new(origin: RowSource, index: usize, row: &'a RawRow) -> Self {
        Self { origin, index, row }
    }

    fn malformed(&self, columns: &[&str], reason: &str) -> ReconcileError {
        ReconcileError::MalformedRow {
            origin: self.origin,
            row: self.index,
            field: columns[0].to_string(),
            reason: reason.to_string(),
        }
    }

    /// Cell text; the column must exist but may be empty
    fn text(&self, columns: &[&str]) -> ReconcileResult<&'a str> {
        self.row
            .get_any(columns)
            .ok_or_else(|| self.malformed(columns, "is missing"))
    }

    /// Trimmed, non-empty cell text
    fn required(&self, columns: &[&str]) -> ReconcileResult<&'a str> {
        let value = self.text(columns)?.trim();
        if value.is_empty() {
            return Err(self.malformed(columns, "is empty"));
        }
        Ok(value)
    }

    fn date(&self, columns: &[&str]) -> ReconcileResult<NaiveDate> {
        let value = self.required(columns)?;
        parse_date(value).ok_or_else(|| self.malformed(columns, "is not a valid date"))
    }

    /// Non-negative amount; an empty cell counts as zero
    fn money(&self, columns: &[&str]) -> ReconcileResult<BigDecimal> {
        let value = self.text(columns)?.trim();
        if value.is_empty() {
            return Ok(BigDecimal::from(0));
        }
        self.non_negative(columns, value)
    }

    fn required_money(&self, columns: &[&str]) -> ReconcileResult<BigDecimal> {
        let value = self.required(columns)?;
        self.non_negative(columns, value)
    }

    fn non_negative(&self, columns: &[&str], value: &str) -> ReconcileResult<BigDecimal> {
        let amount =
            parse_decimal(value).ok_or_else(|| self.malformed(columns, "is not a valid amount"))?;
        if amount < BigDecimal::from(0) {
            return Err(self.malformed(columns, "must not be negative"));
        }
        Ok(amount)
    }
}

/// Parse a date in any of the accepted spreadsheet formats
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
}

/// Parse a decimal written with either separator convention
///
/// With a comma present the comma is the decimal separator and periods group
/// thousands (`1.234,56`). Without one, a single period is the decimal
/// separator (`1234.56`) and several periods group thousands (`1.234.567`).
pub fn parse_decimal(value: &str) -> Option<BigDecimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let canonical = if value.contains(',') {
        value.replace('.', "").replace(',', ".")
    } else if value.matches('.').count() > 1 {
        value.replace('.', "")
    } else {
        value.to_string()
    };

    let digits = canonical.trim_start_matches(['-', '+']);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    BigDecimal::from_str(&canonical).ok()
}

/// Parse a bank statement value into an absolute amount and a direction
///
/// Accepts a trailing `C`/`D` marker (`150,00D`) or a signed number
/// (`-150.00` is a debit, `150.00` a credit).
pub fn parse_statement_amount(value: &str) -> Option<(BigDecimal, Direction)> {
    let value = value.trim();
    let marker = value.chars().last()?.to_ascii_uppercase();

    let (number, direction) = match marker {
        'D' => (&value[..value.len() - 1], Some(Direction::Debit)),
        'C' => (&value[..value.len() - 1], Some(Direction::Credit)),
        _ => (value, None),
    };

    let amount = parse_decimal(number)?;
    let zero = BigDecimal::from(0);

    match direction {
        Some(_) if amount < zero => None,
        Some(direction) => Some((amount, direction)),
        None if amount < zero => Some((amount.abs(), Direction::Debit)),
        None => Some((amount, Direction::Credit)),
    }
}
