//! Per-selection recompute: row filtering and sales aggregation.
//!
//! Everything in here is pure. The dashboard controller owns the dataset and
//! calls into this module once per selection event; no state lives here.

pub mod aggregate;
pub mod filter;

pub use aggregate::{aggregate, aggregate_series};
pub use filter::filter_records;
