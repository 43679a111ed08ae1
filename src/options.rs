//! Run options for the reconciliation engine

use serde::{Deserialize, Serialize};
use std::env;

use crate::types::{ReconcileError, ReconcileResult};

/// How monetary values are written to the export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecimalStyle {
    /// `1.234,56`
    #[default]
    Brazilian,
    /// `1234.56`
    Plain,
}

impl std::str::FromStr for DecimalStyle {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brazilian" | "br" | "comma" => Ok(DecimalStyle::Brazilian),
            "plain" | "period" => Ok(DecimalStyle::Plain),
            other => Err(ReconcileError::Config(format!(
                "unknown decimal style '{}'",
                other
            ))),
        }
    }
}

/// Options applied to a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    pub decimal_style: DecimalStyle,
    /// Prefix the export with a UTF-8 byte order mark
    pub byte_order_mark: bool,
    pub include_header: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            decimal_style: DecimalStyle::default(),
            byte_order_mark: false,
            include_header: true,
        }
    }
}

impl ReconcileOptions {
    /// Read options from `RECONCILE_*` environment variables
    pub fn from_env() -> ReconcileResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            decimal_style: match env::var("RECONCILE_DECIMAL_STYLE") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.decimal_style,
            },
            byte_order_mark: env_flag("RECONCILE_CSV_BOM", defaults.byte_order_mark)?,
            include_header: env_flag("RECONCILE_CSV_HEADER", defaults.include_header)?,
        })
    }

    pub fn with_decimal_style(mut self, decimal_style: DecimalStyle) -> Self {
        self.decimal_style = decimal_style;
        self
    }

    pub fn with_byte_order_mark(mut self, byte_order_mark: bool) -> Self {
        self.byte_order_mark = byte_order_mark;
        self
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }
}

fn env_flag(name: &str, default: bool) -> ReconcileResult<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value)
            .ok_or_else(|| ReconcileError::Config(format!("{} must be true or false", name))),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
