//! Terminal plotting for the non-interactive `report` mode.

mod ascii;

pub use ascii::render_ascii_plot;
