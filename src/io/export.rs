//! Exports: the formatted per-row CSV and the aggregated-series JSON.
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{AggregatedSeries, SalesRecord};
use crate::error::AppError;

/// Write filtered (unaggregated) rows as `Sales,Date,Region` CSV.
///
/// One output row per source row, in dataset order.
pub fn write_formatted_csv(path: &Path, records: &[&SalesRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::runtime(format!(
            "Failed to create output CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "Sales,Date,Region")
        .map_err(|e| AppError::runtime(format!("Failed to write CSV header: {e}")))?;

    for record in records {
        writeln!(
            file,
            "{:.2},{},{}",
            record.sales(),
            record.date,
            record.region
        )
        .map_err(|e| AppError::runtime(format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}

/// Write an aggregated series as JSON (points + summary scalars).
pub fn write_series_json(path: &Path, series: &AggregatedSeries) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(series)
        .map_err(|e| AppError::runtime(format!("Failed to serialize series: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        AppError::runtime(format!(
            "Failed to write series JSON '{}': {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;
    use chrono::NaiveDate;

    #[test]
    fn formatted_csv_has_expected_shape() {
        let record = SalesRecord {
            date: NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(),
            product: "pink morsel".to_string(),
            price: 3.0,
            quantity: 4.0,
            region: Region::parse("north"),
        };

        let path = std::env::temp_dir().join("morsel_formatted_test.csv");
        write_formatted_csv(&path, &[&record]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, "Sales,Date,Region\n12.00,2021-01-10,north\n");
    }
}
