//! Generated demo data.

pub mod sample;

pub use sample::generate_sample;
