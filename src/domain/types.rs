//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during filtering/aggregation
//! - exported to JSON/CSV
//! - reloaded later for comparisons

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A normalized (trimmed, lowercased) region name.
///
/// The default set is `north`/`east`/`south`/`west` plus `unknown`, but region
/// is deliberately an open string type: any other value present in the source
/// data is carried through unchanged and shows up in the TUI selector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Fixed cyclic-fill order used when a source file has no `region` column.
    pub const DEFAULT_CYCLE: [&'static str; 4] = ["north", "east", "south", "west"];

    /// Normalize a raw region value. Empty input maps to `unknown`.
    pub fn parse(raw: &str) -> Self {
        let norm = raw.trim().to_lowercase();
        if norm.is_empty() {
            Self::unknown()
        } else {
            Self(norm)
        }
    }

    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A region selection event value: the `all` sentinel or one named region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionFilter {
    All,
    Named(Region),
}

impl RegionFilter {
    pub fn matches(&self, region: &Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Named(wanted) => wanted == region,
        }
    }
}

impl FromStr for RegionFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(RegionFilter::All)
        } else {
            Ok(RegionFilter::Named(Region::parse(s)))
        }
    }
}

impl std::fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionFilter::All => f.write_str("all"),
            RegionFilter::Named(region) => f.write_str(region.as_str()),
        }
    }
}

/// One source record exactly as read from a CSV row, before any typing.
///
/// Only exists between the CSV reader and the normalizer; rows that fail
/// normalization are dropped here and never reach the [`Dataset`].
#[derive(Debug, Clone)]
pub struct RawRow {
    pub product: String,
    pub date: String,
    pub price: String,
    pub quantity: String,
    /// `None` when the source file has no `region` column at all.
    pub region: Option<String>,
}

/// A fully parsed, validated sales record (one canonical row).
///
/// `sales` is intentionally a method, not a field: it is always derived from
/// `price * quantity` and can never drift from its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    /// Trimmed, lowercased product name.
    pub product: String,
    /// Non-negative unit price (currency symbols already stripped).
    pub price: f64,
    /// Non-negative quantity.
    pub quantity: f64,
    pub region: Region,
}

impl SalesRecord {
    /// Derived sales amount for this record.
    pub fn sales(&self) -> f64 {
        self.price * self.quantity
    }
}

/// The full normalized table, owned by the dashboard controller.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(min, max)` dates over all records, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Sorted, distinct regions observed in the table.
    pub fn regions(&self) -> Vec<Region> {
        let mut out: Vec<Region> = self.records.iter().map(|r| r.region.clone()).collect();
        out.sort();
        out.dedup();
        out
    }
}

/// One `(date[, region]) -> summed sales` output of the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub date: NaiveDate,
    /// `Some` only when aggregation was grouped by region.
    pub region: Option<Region>,
    pub sales: f64,
}

/// An aggregated time series plus the summary scalars the UI displays.
///
/// Bounds are `Option` so an empty series reads as "no data" instead of
/// panicking on a max/min of nothing.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedSeries {
    pub points: Vec<AggregatedPoint>,
    pub total_sales: f64,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

impl AggregatedSeries {
    pub fn from_points(points: Vec<AggregatedPoint>) -> Self {
        let total_sales = points.iter().map(|p| p.sales).sum();
        let date_min = points.iter().map(|p| p.date).min();
        let date_max = points.iter().map(|p| p.date).max();
        Self {
            points,
            total_sales,
            date_min,
            date_max,
        }
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest per-point sales value, or `None` when the series is empty.
    pub fn sales_max(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.sales)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }
}

/// Load diagnostics returned by `Dashboard::initialize`.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub n_files: usize,
    /// Data rows read from all sources (header rows excluded).
    pub rows_read: usize,
    /// Rows dropped for unparsable/invalid date, price, or quantity.
    pub rows_dropped: usize,
    /// Rows in the canonical table.
    pub rows_loaded: usize,
    /// Rows matching the target product (before any region filter).
    pub target_rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Directory searched (recursively) for `*.csv` sources.
    pub data_dir: PathBuf,
    /// Product the dashboard filters to. Compared trim+case-insensitively.
    pub target_product: String,
    /// Use generated demo data instead of reading files (non-default).
    pub demo: bool,
    pub demo_count: usize,
    pub demo_seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parse_normalizes_case_and_whitespace() {
        assert_eq!(Region::parse("  North "), Region::parse("north"));
        assert_eq!(Region::parse("").as_str(), "unknown");
    }

    #[test]
    fn region_filter_all_matches_everything() {
        let filter: RegionFilter = "ALL".parse().unwrap();
        assert_eq!(filter, RegionFilter::All);
        assert!(filter.matches(&Region::parse("south")));
        assert!(filter.matches(&Region::unknown()));
    }

    #[test]
    fn region_filter_named_is_case_insensitive() {
        let filter: RegionFilter = " North ".parse().unwrap();
        assert!(filter.matches(&Region::parse("north")));
        assert!(!filter.matches(&Region::parse("south")));
    }

    #[test]
    fn sales_is_always_derived() {
        let record = SalesRecord {
            date: NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(),
            product: "pink morsel".to_string(),
            price: 3.0,
            quantity: 4.0,
            region: Region::parse("north"),
        };
        assert!((record.sales() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn empty_series_reports_no_data() {
        let series = AggregatedSeries::from_points(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.date_min, None);
        assert_eq!(series.date_max, None);
        assert_eq!(series.sales_max(), None);
        assert_eq!(series.total_sales, 0.0);
    }
}
