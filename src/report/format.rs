//! Reporting utilities: load summary, series tables, drop diagnostics.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AggregatedSeries, LoadConfig, LoadSummary, RegionFilter};
use crate::io::ingest::RowError;

/// Max per-row diagnostics echoed to the terminal; the rest is summarized.
const MAX_ROW_ERRORS_SHOWN: usize = 10;

/// Format the load summary (file/row counts + date range).
pub fn format_load_summary(summary: &LoadSummary, config: &LoadConfig) -> String {
    let mut out = String::new();

    out.push_str("=== morsel - Sales Trends ===\n");
    if config.demo {
        out.push_str(&format!(
            "Source: demo data (seed={}, days={})\n",
            config.demo_seed, config.demo_count
        ));
    } else {
        out.push_str(&format!(
            "Source: {} file(s) under '{}'\n",
            summary.n_files,
            config.data_dir.display()
        ));
    }
    out.push_str(&format!("Product: {}\n", config.target_product));
    out.push_str(&format!(
        "Rows: read={} | dropped={} | loaded={} | matching product={}\n",
        summary.rows_read, summary.rows_dropped, summary.rows_loaded, summary.target_rows
    ));

    match summary.date_range {
        Some((min, max)) => out.push_str(&format!("Dates: {min} to {max}\n")),
        None => out.push_str("Dates: no data\n"),
    }

    if summary.target_rows == 0 {
        out.push_str(&format!(
            "Warning: no rows match product '{}' (check the `product` column in the sources).\n",
            config.target_product
        ));
    }

    out
}

/// Format an aggregated series as a table.
pub fn format_series(series: &AggregatedSeries, region: &RegionFilter) -> String {
    let mut out = String::new();

    out.push_str(&format!("Series (region: {region}):\n"));
    if series.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let grouped = series.points.iter().any(|p| p.region.is_some());
    if grouped {
        out.push_str(&format!("{:<12} {:<10} {:>14}\n", "date", "region", "sales"));
    } else {
        out.push_str(&format!("{:<12} {:>14}\n", "date", "sales"));
    }

    for point in &series.points {
        match &point.region {
            Some(r) => out.push_str(&format!(
                "{:<12} {:<10} {:>14.2}\n",
                point.date.to_string(),
                r.as_str(),
                point.sales
            )),
            None => out.push_str(&format!(
                "{:<12} {:>14.2}\n",
                point.date.to_string(),
                point.sales
            )),
        }
    }

    out.push_str(&format!(
        "Total: {:.2} over {} point(s)\n",
        series.total_sales,
        series.n_points()
    ));

    out
}

/// Format a sample of per-row drop diagnostics.
pub fn format_row_errors(errors: &[RowError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("Dropped rows ({}):\n", errors.len()));
    for err in errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
        out.push_str(&format!("  {}:{}: {}\n", err.file, err.line, err.message));
    }
    if errors.len() > MAX_ROW_ERRORS_SHOWN {
        out.push_str(&format!(
            "  ... and {} more\n",
            errors.len() - MAX_ROW_ERRORS_SHOWN
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregatedPoint, Region};
    use chrono::NaiveDate;

    #[test]
    fn empty_series_renders_no_data_line() {
        let series = AggregatedSeries::from_points(Vec::new());
        let text = format_series(&series, &RegionFilter::All);
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn grouped_series_includes_region_column() {
        let series = AggregatedSeries::from_points(vec![AggregatedPoint {
            date: NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(),
            region: Some(Region::parse("north")),
            sales: 12.0,
        }]);
        let text = format_series(&series, &RegionFilter::All);
        assert!(text.contains("north"));
        assert!(text.contains("12.00"));
    }
}
