//! The dashboard controller: load once, recompute per selection.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! discover sources -> ingest/normalize -> [filter -> aggregate] per event
//!
//! The CLI report mode and the TUI both drive this type and focus on
//! presentation (printing vs widgets).

use crate::data::generate_sample;
use crate::domain::{
    AggregatedSeries, Dataset, LoadConfig, LoadSummary, Region, RegionFilter, SalesRecord,
};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, RowError, load_sales_records};
use crate::io::sources::find_sources;
use crate::query::{aggregate_series, filter_records};

/// Owns the normalized dataset for the process lifetime.
///
/// The dataset is immutable after [`Dashboard::initialize`]; every recompute
/// borrows it read-only, so repeated or concurrent selection events cannot
/// interfere with each other.
pub struct Dashboard {
    config: LoadConfig,
    dataset: Dataset,
    row_errors: Vec<RowError>,
}

impl Dashboard {
    /// Run the normalizer once and return the controller plus load diagnostics.
    ///
    /// Fails with exit code 2 when no sources are found and exit code 3 when
    /// normalization drops every row.
    pub fn initialize(config: &LoadConfig) -> Result<(Self, LoadSummary), AppError> {
        let ingest = if config.demo {
            let records = generate_sample(config)?;
            IngestedData {
                rows_read: records.len(),
                rows_used: records.len(),
                records,
                row_errors: Vec::new(),
                n_files: 0,
            }
        } else {
            let sources = find_sources(&config.data_dir)?;
            load_sales_records(&sources)?
        };

        let dataset = Dataset::new(ingest.records);
        if dataset.is_empty() {
            return Err(AppError::empty("Dataset is empty after normalization."));
        }

        let target_rows =
            filter_records(dataset.records(), &config.target_product, &RegionFilter::All).len();

        let summary = LoadSummary {
            n_files: ingest.n_files,
            rows_read: ingest.rows_read,
            rows_dropped: ingest.row_errors.len(),
            rows_loaded: dataset.len(),
            target_rows,
            date_range: dataset.date_range(),
        };

        let dashboard = Self {
            config: config.clone(),
            dataset,
            row_errors: ingest.row_errors,
        };
        Ok((dashboard, summary))
    }

    /// The sole recompute entry point: filter to the target product and the
    /// selected region, then aggregate by date.
    ///
    /// Takes `&self`; the stored dataset is never mutated. An empty series is
    /// a valid result (the caller renders an empty state).
    pub fn on_region_selected(&self, region: &RegionFilter) -> AggregatedSeries {
        let rows = filter_records(self.dataset.records(), &self.config.target_product, region);
        aggregate_series(&rows, false)
    }

    /// Per-region aggregation over all target-product rows, used for the
    /// multi-line overlay when "all" is selected.
    pub fn regional_breakdown(&self) -> AggregatedSeries {
        let rows = filter_records(
            self.dataset.records(),
            &self.config.target_product,
            &RegionFilter::All,
        );
        aggregate_series(&rows, true)
    }

    /// Filtered rows in dataset order (for the per-row transform export).
    pub fn filtered_rows(&self, region: &RegionFilter) -> Vec<&SalesRecord> {
        filter_records(self.dataset.records(), &self.config.target_product, region)
    }

    /// Sorted distinct regions observed in the dataset.
    pub fn regions(&self) -> Vec<Region> {
        self.dataset.regions()
    }

    pub fn target_product(&self) -> &str {
        &self.config.target_product
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Per-row drop diagnostics recorded during ingest.
    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_config() -> LoadConfig {
        LoadConfig {
            data_dir: "data".into(),
            target_product: "pink morsel".to_string(),
            demo: true,
            demo_count: 30,
            demo_seed: 42,
        }
    }

    #[test]
    fn initialize_reports_counts_and_range() {
        let (dashboard, summary) = Dashboard::initialize(&demo_config()).unwrap();
        assert!(summary.rows_loaded > 0);
        assert_eq!(summary.rows_loaded, dashboard.dataset().len());
        assert!(summary.target_rows <= summary.rows_loaded);
        assert!(summary.date_range.is_some());
        assert_eq!(summary.rows_dropped, 0);
    }

    #[test]
    fn region_all_equals_unfiltered_aggregation() {
        let (dashboard, _) = Dashboard::initialize(&demo_config()).unwrap();
        let all = dashboard.on_region_selected(&RegionFilter::All);
        let breakdown = dashboard.regional_breakdown();
        assert!((all.total_sales - breakdown.total_sales).abs() < 1e-9);
    }

    #[test]
    fn repeated_selections_are_stable() {
        let (dashboard, _) = Dashboard::initialize(&demo_config()).unwrap();
        let filter: RegionFilter = "north".parse().unwrap();
        let first = dashboard.on_region_selected(&filter);
        let second = dashboard.on_region_selected(&filter);
        assert_eq!(first.n_points(), second.n_points());
        assert!((first.total_sales - second.total_sales).abs() < 1e-12);
    }

    #[test]
    fn regional_series_sum_to_the_all_series() {
        let (dashboard, _) = Dashboard::initialize(&demo_config()).unwrap();
        let all = dashboard.on_region_selected(&RegionFilter::All);

        let mut regional_total = 0.0;
        for region in dashboard.regions() {
            let filter = RegionFilter::Named(region);
            regional_total += dashboard.on_region_selected(&filter).total_sales;
        }
        assert!((all.total_sales - regional_total).abs() < 1e-6);
    }

    #[test]
    fn unknown_region_selection_is_empty_not_an_error() {
        let (dashboard, _) = Dashboard::initialize(&demo_config()).unwrap();
        let series = dashboard.on_region_selected(&"atlantis".parse().unwrap());
        assert!(series.is_empty());
        assert_eq!(series.sales_max(), None);
    }

    #[test]
    fn target_product_is_a_parameter() {
        let mut config = demo_config();
        config.target_product = "lavender morsel".to_string();
        let (dashboard, summary) = Dashboard::initialize(&config).unwrap();
        assert!(summary.target_rows > 0);
        let series = dashboard.on_region_selected(&RegionFilter::All);
        assert!(series.total_sales > 0.0);
    }
}
