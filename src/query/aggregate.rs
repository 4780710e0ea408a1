//! Sales aggregation into a sorted time series.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{AggregatedPoint, AggregatedSeries, Region, SalesRecord};

/// Group rows by date (and region when `group_by_region`), summing derived
/// sales within each group.
///
/// Output is sorted ascending by date; ties on date are broken by region name
/// so rendering order is deterministic. Empty input yields an empty output.
pub fn aggregate(rows: &[&SalesRecord], group_by_region: bool) -> Vec<AggregatedPoint> {
    let mut groups: BTreeMap<(NaiveDate, Option<Region>), f64> = BTreeMap::new();

    for row in rows {
        let key = (row.date, group_by_region.then(|| row.region.clone()));
        *groups.entry(key).or_insert(0.0) += row.sales();
    }

    groups
        .into_iter()
        .map(|((date, region), sales)| AggregatedPoint {
            date,
            region,
            sales,
        })
        .collect()
}

/// [`aggregate`] plus the summary scalars the UI displays.
pub fn aggregate_series(rows: &[&SalesRecord], group_by_region: bool) -> AggregatedSeries {
    AggregatedSeries::from_points(aggregate(rows, group_by_region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegionFilter;
    use crate::query::filter_records;

    fn record(date: (i32, u32, u32), price: f64, quantity: f64, region: &str) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            product: "pink morsel".to_string(),
            price,
            quantity,
            region: Region::parse(region),
        }
    }

    #[test]
    fn sums_sales_per_date() {
        // The two worked examples: $3.00 x 4 (north) + 2 x 1 (south) on the
        // same date aggregate to 14.0; north alone is 12.0.
        let records = vec![
            record((2021, 1, 10), 3.0, 4.0, "North"),
            record((2021, 1, 10), 2.0, 1.0, "south"),
        ];

        let all = filter_records(&records, "pink morsel", &RegionFilter::All);
        let series = aggregate(&all, false);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2021, 1, 10).unwrap());
        assert!((series[0].sales - 14.0).abs() < 1e-12);
        assert_eq!(series[0].region, None);

        let north = filter_records(&records, "pink morsel", &"north".parse().unwrap());
        let series = aggregate(&north, false);
        assert_eq!(series.len(), 1);
        assert!((series[0].sales - 12.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = aggregate_series(&[], false);
        assert!(series.is_empty());
        assert_eq!(series.sales_max(), None);
    }

    #[test]
    fn sorted_by_date_then_region() {
        let records = vec![
            record((2021, 2, 1), 1.0, 1.0, "west"),
            record((2021, 1, 1), 1.0, 1.0, "south"),
            record((2021, 2, 1), 1.0, 1.0, "east"),
        ];
        let rows: Vec<&SalesRecord> = records.iter().collect();
        let points = aggregate(&rows, true);

        let keys: Vec<(NaiveDate, &str)> = points
            .iter()
            .map(|p| (p.date, p.region.as_ref().unwrap().as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(), "south"),
                (NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(), "east"),
                (NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(), "west"),
            ]
        );
    }

    #[test]
    fn total_sales_is_conserved() {
        let records = vec![
            record((2021, 1, 1), 2.5, 2.0, "north"),
            record((2021, 1, 1), 1.0, 3.0, "east"),
            record((2021, 1, 2), 4.0, 1.0, "south"),
        ];
        let rows: Vec<&SalesRecord> = records.iter().collect();
        let input_total: f64 = rows.iter().map(|r| r.sales()).sum();

        for group_by_region in [false, true] {
            let series = aggregate_series(&rows, group_by_region);
            assert!((series.total_sales - input_total).abs() < 1e-9);
        }
    }

    #[test]
    fn grouped_and_ungrouped_totals_agree() {
        let records = vec![
            record((2021, 1, 1), 1.0, 1.0, "north"),
            record((2021, 1, 1), 2.0, 1.0, "south"),
        ];
        let rows: Vec<&SalesRecord> = records.iter().collect();
        let by_date = aggregate(&rows, false);
        let by_region = aggregate(&rows, true);
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_region.len(), 2);
        let regional_sum: f64 = by_region.iter().map(|p| p.sales).sum();
        assert!((by_date[0].sales - regional_sum).abs() < 1e-12);
    }
}
