//! Utility modules

pub mod memory_config;
pub mod validation;

pub use memory_config::*;
pub use validation::*;
