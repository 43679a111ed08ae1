//! Chart-of-accounts configuration and resolution

pub mod config;
pub mod resolver;

pub use config::*;
pub use resolver::*;
