//! Row filtering by target product and region selection.

use crate::domain::{RegionFilter, SalesRecord};

/// Retain rows matching `target_product` (trim + case-insensitive) and the
/// region selection. Preserves input order; an empty result is a valid output.
pub fn filter_records<'a>(
    records: &'a [SalesRecord],
    target_product: &str,
    region: &RegionFilter,
) -> Vec<&'a SalesRecord> {
    records
        .iter()
        .filter(|r| matches_product(&r.product, target_product))
        .filter(|r| region.matches(&r.region))
        .collect()
}

fn matches_product(value: &str, target: &str) -> bool {
    value.trim().eq_ignore_ascii_case(target.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Region;
    use chrono::NaiveDate;

    fn record(product: &str, region: &str) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(2021, 1, 10).unwrap(),
            product: product.to_string(),
            price: 1.0,
            quantity: 1.0,
            region: Region::parse(region),
        }
    }

    #[test]
    fn product_match_ignores_case_and_whitespace() {
        let records = vec![
            record("pink morsel", "north"),
            record("lavender morsel", "north"),
        ];
        let out = filter_records(&records, "  PINK MORSEL ", &RegionFilter::All);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product, "pink morsel");
    }

    #[test]
    fn region_all_applies_no_region_predicate() {
        let records = vec![
            record("pink morsel", "north"),
            record("pink morsel", "south"),
        ];
        let out = filter_records(&records, "pink morsel", &RegionFilter::All);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn named_region_restricts_rows() {
        let records = vec![
            record("pink morsel", "north"),
            record("pink morsel", "south"),
        ];
        let filter: RegionFilter = "north".parse().unwrap();
        let out = filter_records(&records, "pink morsel", &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].region, Region::parse("north"));
    }

    #[test]
    fn no_match_returns_empty_not_error() {
        let records = vec![record("pink morsel", "north")];
        let out = filter_records(&records, "blue morsel", &RegionFilter::All);
        assert!(out.is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let mut records = Vec::new();
        for day in 1..=5 {
            let mut r = record("pink morsel", "north");
            r.date = NaiveDate::from_ymd_opt(2021, 1, day).unwrap();
            records.push(r);
        }
        let out = filter_records(&records, "pink morsel", &RegionFilter::All);
        let dates: Vec<_> = out.iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }
}
