//! Shared domain types for the sales pipeline.

mod types;

pub use types::*;
