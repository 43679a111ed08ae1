//! Export formats for accounting lines

pub mod csv;

pub use self::csv::*;
