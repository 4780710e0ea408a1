//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes the dashboard controller (load + normalize)
//! - dispatches to the TUI, the terminal report, or the transform export

use clap::Parser;

use crate::cli::{Command, ReportArgs, TransformArgs};
use crate::error::AppError;

pub mod pipeline;

use pipeline::Dashboard;

/// Entry point for the `morsel` binary.
pub fn run() -> Result<(), AppError> {
    // We want `morsel` and `morsel --demo` to behave like `morsel tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(&args.to_config()),
        Command::Report(args) => handle_report(args),
        Command::Transform(args) => handle_transform(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = args.load.to_config();
    let (dashboard, summary) = Dashboard::initialize(&config)?;

    println!("{}", crate::report::format_load_summary(&summary, &config));

    let diagnostics = crate::report::format_row_errors(dashboard.row_errors());
    if !diagnostics.is_empty() {
        println!("{diagnostics}");
    }

    let series = if args.by_region && args.region == crate::domain::RegionFilter::All {
        dashboard.regional_breakdown()
    } else {
        dashboard.on_region_selected(&args.region)
    };

    println!("{}", crate::report::format_series(&series, &args.region));

    if !args.no_plot && !series.is_empty() {
        // Plot the date-only series; a region-grouped table would overdraw.
        let line_series = dashboard.on_region_selected(&args.region);
        let plot = crate::plot::render_ascii_plot(&line_series, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export_series {
        crate::io::export::write_series_json(path, &series)?;
        println!("Wrote series JSON: {}", path.display());
    }

    Ok(())
}

fn handle_transform(args: TransformArgs) -> Result<(), AppError> {
    let config = args.load.to_config();
    let (dashboard, summary) = Dashboard::initialize(&config)?;

    let rows = dashboard.filtered_rows(&args.region);
    if rows.is_empty() {
        eprintln!(
            "Warning: no rows found for '{}' (region: {}); writing header only.",
            dashboard.target_product(),
            args.region
        );
    }

    crate::io::export::write_formatted_csv(&args.output, &rows)?;
    println!(
        "Wrote {} row(s) to {} (read {}, dropped {}).",
        rows.len(),
        args.output.display(),
        summary.rows_read,
        summary.rows_dropped
    );

    Ok(())
}

/// Rewrite argv so `morsel` defaults to `morsel tui`.
///
/// Rules:
/// - `morsel`                      -> `morsel tui`
/// - `morsel --demo ...`           -> `morsel tui --demo ...`
/// - `morsel --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "transform");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["morsel"])), args(&["morsel", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flag() {
        assert_eq!(
            rewrite_args(args(&["morsel", "--demo"])),
            args(&["morsel", "tui", "--demo"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["morsel", "report"])),
            args(&["morsel", "report"])
        );
        assert_eq!(
            rewrite_args(args(&["morsel", "--help"])),
            args(&["morsel", "--help"])
        );
    }
}
