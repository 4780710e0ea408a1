//! Formatted terminal output for the non-interactive `report` mode.

mod format;

pub use format::*;
