//! Reconciliation pipeline: normalize, match, classify, group into lots

pub mod classifier;
pub mod engine;
pub mod lot;
pub mod matcher;
pub mod normalizer;

pub use classifier::*;
pub use engine::*;
pub use lot::*;
pub use matcher::*;
pub use normalizer::*;
