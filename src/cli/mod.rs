//! Command-line parsing for the sales trends dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{LoadConfig, RegionFilter};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "morsel", version, about = "Daily product sales trends dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI dashboard.
    ///
    /// Loads the dataset once, then recomputes the chart on every region
    /// selection.
    Tui(LoadArgs),
    /// Print the load summary and the aggregated series to the terminal.
    Report(ReportArgs),
    /// Write the filtered per-row CSV (`Sales,Date,Region`).
    Transform(TransformArgs),
}

/// Common options for loading the dataset.
#[derive(Debug, Parser, Clone)]
pub struct LoadArgs {
    /// Directory searched recursively for *.csv source files.
    #[arg(short = 'd', long, default_value = "data")]
    pub data: PathBuf,

    /// Product the dashboard filters to (trim + case-insensitive match).
    #[arg(short = 'p', long, default_value = "pink morsel")]
    pub product: String,

    /// Use generated demo data instead of reading CSV files.
    #[arg(long)]
    pub demo: bool,

    /// Number of demo days to generate (with --demo).
    #[arg(long, default_value_t = 120)]
    pub demo_count: usize,

    /// Random seed for demo data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl LoadArgs {
    pub fn to_config(&self) -> LoadConfig {
        LoadConfig {
            data_dir: self.data.clone(),
            target_product: self.product.clone(),
            demo: self.demo,
            demo_count: self.demo_count,
            demo_seed: self.seed,
        }
    }
}

/// Options for the non-interactive report.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Region selection: `all` or a region name.
    #[arg(short = 'r', long, default_value = "all")]
    pub region: RegionFilter,

    /// Additionally group the series by region.
    #[arg(long)]
    pub by_region: bool,

    /// Disable the terminal plot (rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the aggregated series to JSON.
    #[arg(long = "export-series", value_name = "JSON")]
    pub export_series: Option<PathBuf>,
}

/// Options for the per-row transform export.
#[derive(Debug, Parser)]
pub struct TransformArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Region selection: `all` or a region name.
    #[arg(short = 'r', long, default_value = "all")]
    pub region: RegionFilter,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "formatted_sales.csv")]
    pub output: PathBuf,
}
