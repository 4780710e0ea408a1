//! File input/output: source discovery, CSV ingest, exports.

pub mod export;
pub mod ingest;
pub mod sources;
