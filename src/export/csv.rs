//! Semicolon-separated export for the bookkeeping import
//!
//! Columns: `Data;Cod Conta Débito;Cod Conta Crédito;Valor;Cod Histórico;Complemento;Inicia Lote`.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use ::csv::{Terminator, WriterBuilder};

use crate::options::{DecimalStyle, ReconcileOptions};
use crate::types::*;

pub const HEADER: [&str; 7] = [
    "Data",
    "Cod Conta Débito",
    "Cod Conta Crédito",
    "Valor",
    "Cod Histórico",
    "Complemento",
    "Inicia Lote",
];

/// Value written in `Inicia Lote` on lot-opening lines
pub const LOT_START_MARKER: &str = "1";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Renders accounting lines to CSV text
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter {
    options: ReconcileOptions,
}

impl CsvExporter {
    pub fn new(options: ReconcileOptions) -> Self {
        Self { options }
    }

    /// Render the lines, in order, to UTF-8 text
    pub fn render(&self, lines: &[AccountingLine]) -> ReconcileResult<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(Vec::new());

        if self.options.include_header {
            writer.write_record(HEADER).map_err(export_error)?;
        }

        for line in lines {
            writer
                .write_record(self.record(line))
                .map_err(export_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReconcileError::Export(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| ReconcileError::Export(e.to_string()))?;

        if self.options.byte_order_mark {
            Ok(format!("\u{feff}{}", text))
        } else {
            Ok(text)
        }
    }

    fn record(&self, line: &AccountingLine) -> [String; 7] {
        [
            format_date(line.date),
            format_code(line.debit_account),
            format_code(line.credit_account),
            format_amount(&line.value, self.options.decimal_style),
            line.history_code.to_string(),
            line.complement.clone(),
            match line.lot {
                LotMarker::Start => LOT_START_MARKER.to_string(),
                LotMarker::Continuation => String::new(),
            },
        ]
    }
}

/// Render lines with the given options
pub fn to_csv(lines: &[AccountingLine], options: ReconcileOptions) -> ReconcileResult<String> {
    CsvExporter::new(options).render(lines)
}

fn export_error(e: ::csv::Error) -> ReconcileError {
    ReconcileError::Export(e.to_string())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_code(code: Option<AccountCode>) -> String {
    code.map(|c| c.to_string()).unwrap_or_default()
}

/// Format an amount with two decimal places in the given style
pub fn format_amount(value: &BigDecimal, style: DecimalStyle) -> String {
    let (digits, _) = value.round(2).with_scale(2).as_bigint_and_exponent();
    let digits = digits.to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };

    let padded = format!("{:0>3}", digits);
    let (integer, fraction) = padded.split_at(padded.len() - 2);

    match style {
        DecimalStyle::Plain => format!("{}{}.{}", sign, integer, fraction),
        DecimalStyle::Brazilian => {
            format!("{}{},{}", sign, group_thousands(integer, '.'), fraction)
        }
    }
}

fn group_thousands(integer: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
