//! # Reconciliation Core
//!
//! Reconciles a bank statement against an accounts-payable ledger for one
//! legal entity and produces the double-entry CSV imported by the
//! bookkeeping system.
//!
//! ## Features
//!
//! - **Normalization**: `150,00D`, `-150.00` and `1.234,56` style cells become typed amounts
//! - **Matching**: bank outflows paired with ledger entries by date and exact amount
//! - **Classification**: matched payments, cash payments, deposits and withdrawals
//! - **Lots**: fine, discount and fee lines grouped under their principal line
//! - **Export**: semicolon-separated CSV with a lot-start marker
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{reconcile, AccountConfig, FixedCode, RawRow};
//!
//! let config = AccountConfig::new()
//!     .with_supplier("ACME", 10)
//!     .with_fixed(FixedCode::Cash, 5)
//!     .with_fixed(FixedCode::BankPayment, 7)
//!     .with_fixed(FixedCode::Discount, 60)
//!     .with_fixed(FixedCode::FineInterest, 50)
//!     .with_fixed(FixedCode::Fee, 316);
//!
//! let bank = vec![RawRow::new()
//!     .with("Date", "05/03/2024")
//!     .with("Description", "PAG BOLETO ACME")
//!     .with("Value", "1.000,00D")];
//! let ledger = vec![RawRow::new()
//!     .with("PaymentDate", "05/03/2024")
//!     .with("SupplierName", "ACME")
//!     .with("InvoiceNumber", "123")
//!     .with("Value", "1.000,00")
//!     .with("Discounts", "")
//!     .with("LateFeeAndInterest", "")
//!     .with("ValueToPay", "1.000,00")
//!     .with("BoletoFees", "")];
//!
//! let result = reconcile(&bank, &ledger, &config).unwrap();
//! assert_eq!(result.summary.matched, 1);
//! assert!(result.csv.contains("05/03/2024;10;7;1.000,00;34;123 ACME;1"));
//! ```

pub mod accounts;
pub mod export;
pub mod options;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use accounts::*;
pub use export::{format_amount, to_csv, CsvExporter};
pub use options::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
