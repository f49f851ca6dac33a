//! Aggregator for merging per-source GMP extractions and computing
//! market statistics

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::types::{GmpRecord, IpoListing, IpoStatus, MarketStats};

/// How many records the trending view returns
const TRENDING_LIMIT: usize = 10;

pub struct Aggregator;

impl Aggregator {
    /// Merge per-source extraction results into one keyed mapping.
    ///
    /// Merge order is the iteration order of `per_source`; for identical
    /// identifiers the source processed last wins. No reconciliation, no
    /// quality weighting — a plain overwrite.
    pub fn merge<I>(per_source: I) -> HashMap<String, GmpRecord>
    where
        I: IntoIterator<Item = Vec<GmpRecord>>,
    {
        let mut merged = HashMap::new();
        for records in per_source {
            for record in records {
                merged.insert(record.identifier.clone(), record);
            }
        }
        merged
    }

    /// Top records by premium, descending, identifier ascending on ties.
    /// Returns at most [`TRENDING_LIMIT`] entries.
    pub fn trending(records: &HashMap<String, GmpRecord>) -> Vec<GmpRecord> {
        let mut sorted: Vec<GmpRecord> = records.values().cloned().collect();
        sorted.sort_by(|a, b| b.gmp.cmp(&a.gmp).then_with(|| a.identifier.cmp(&b.identifier)));
        sorted.truncate(TRENDING_LIMIT);
        sorted
    }

    /// Exact-match lookup; absence is an ordinary outcome, not an error.
    pub fn lookup<'a>(
        records: &'a HashMap<String, GmpRecord>,
        identifier: &str,
    ) -> Option<&'a GmpRecord> {
        records.get(identifier)
    }

    /// Aggregate statistics over the current listing set.
    ///
    /// Averages are rounded to two decimals; an empty set yields zeros
    /// rather than an error or NaN.
    pub fn stats(listings: &[IpoListing], last_updated: DateTime<Utc>) -> MarketStats {
        let total_ipos = listings.len();
        let active_ipos = listings
            .iter()
            .filter(|i| matches!(i.status, IpoStatus::Open | IpoStatus::Upcoming))
            .count();

        let (average_gmp, average_subscription) = if listings.is_empty() {
            (0.0, 0.0)
        } else {
            let n = listings.len() as f64;
            let gmp_sum: f64 = listings.iter().map(|i| i.gmp_percent).sum();
            let sub_sum: f64 = listings.iter().map(|i| i.subscription).sum();
            (round2(gmp_sum / n), round2(sub_sum / n))
        };

        MarketStats {
            total_ipos,
            active_ipos,
            average_gmp,
            average_subscription,
            last_updated,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Reliability;

    fn record(identifier: &str, gmp: i64, source: &str) -> GmpRecord {
        GmpRecord {
            identifier: identifier.to_string(),
            gmp,
            gmp_percent: gmp as f64 / 2.0,
            source_url: source.to_string(),
            observed_at: Utc::now(),
            reliability: Reliability::Medium,
        }
    }

    fn listing(gmp_percent: f64, subscription: f64, status: IpoStatus) -> IpoListing {
        IpoListing {
            company_name: "X".to_string(),
            symbol: None,
            sector: String::new(),
            issue_price: 100.0,
            price_range_min: 0.0,
            price_range_max: 0.0,
            gmp: 0,
            gmp_percent,
            subscription,
            status,
            open_date: None,
            close_date: None,
            allotment_date: None,
            listing_date: None,
        }
    }

    // ========== merge ==========

    #[test]
    fn test_merge_empty() {
        let merged = Aggregator::merge(Vec::<Vec<GmpRecord>>::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_last_write_wins() {
        let source_a = vec![record("X", 10, "a"), record("Y", 5, "a")];
        let source_b = vec![record("X", 99, "b")];

        let merged = Aggregator::merge(vec![source_a, source_b]);

        assert_eq!(merged.len(), 2);
        let x = merged.get("X").unwrap();
        assert_eq!(x.gmp, 99);
        assert_eq!(x.source_url, "b");
        assert_eq!(merged.get("Y").unwrap().source_url, "a");
    }

    #[test]
    fn test_merge_within_single_source_later_row_wins() {
        let source = vec![record("X", 1, "a"), record("X", 2, "a")];
        let merged = Aggregator::merge(vec![source]);
        assert_eq!(merged.get("X").unwrap().gmp, 2);
    }

    // ========== trending ==========

    #[test]
    fn test_trending_sorted_descending() {
        let merged = Aggregator::merge(vec![vec![
            record("C", 3, "s"),
            record("A", 135, "s"),
            record("B", 23, "s"),
            record("D", 12, "s"),
        ]]);

        let top = Aggregator::trending(&merged);

        let gmps: Vec<i64> = top.iter().map(|r| r.gmp).collect();
        assert_eq!(gmps, vec![135, 23, 12, 3]);
    }

    #[test]
    fn test_trending_tie_break_identifier_ascending() {
        let merged = Aggregator::merge(vec![vec![
            record("ZETA", 10, "s"),
            record("ALPHA", 10, "s"),
        ]]);

        let top = Aggregator::trending(&merged);

        assert_eq!(top[0].identifier, "ALPHA");
        assert_eq!(top[1].identifier, "ZETA");
    }

    #[test]
    fn test_trending_caps_at_ten() {
        let records: Vec<GmpRecord> = (0..15)
            .map(|i| record(&format!("IPO{i:02}"), i, "s"))
            .collect();
        let merged = Aggregator::merge(vec![records]);

        let top = Aggregator::trending(&merged);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].gmp, 14);
    }

    #[test]
    fn test_trending_fewer_than_ten() {
        let merged = Aggregator::merge(vec![vec![record("A", 1, "s")]]);
        assert_eq!(Aggregator::trending(&merged).len(), 1);
    }

    // ========== lookup ==========

    #[test]
    fn test_lookup_exact_match_only() {
        let merged = Aggregator::merge(vec![vec![record("DHARA RAIL", 23, "s")]]);
        assert!(Aggregator::lookup(&merged, "DHARA RAIL").is_some());
        assert!(Aggregator::lookup(&merged, "Dhara Rail").is_none());
        assert!(Aggregator::lookup(&merged, "DHARA").is_none());
    }

    // ========== stats ==========

    #[test]
    fn test_stats_empty_listings_yield_zeros() {
        let stats = Aggregator::stats(&[], Utc::now());
        assert_eq!(stats.total_ipos, 0);
        assert_eq!(stats.active_ipos, 0);
        assert_eq!(stats.average_gmp, 0.0);
        assert_eq!(stats.average_subscription, 0.0);
    }

    #[test]
    fn test_stats_averages_rounded_to_two_decimals() {
        let listings = vec![
            listing(10.0, 3.0, IpoStatus::Open),
            listing(20.333, 4.0, IpoStatus::Listed),
            listing(30.0, 5.111, IpoStatus::Closed),
        ];

        let stats = Aggregator::stats(&listings, Utc::now());

        assert_eq!(stats.total_ipos, 3);
        assert!((stats.average_gmp - 20.11).abs() < f64::EPSILON);
        assert!((stats.average_subscription - 4.04).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_active_counts_open_and_upcoming() {
        let listings = vec![
            listing(0.0, 0.0, IpoStatus::Open),
            listing(0.0, 0.0, IpoStatus::Upcoming),
            listing(0.0, 0.0, IpoStatus::Closed),
            listing(0.0, 0.0, IpoStatus::Listed),
        ];
        let stats = Aggregator::stats(&listings, Utc::now());
        assert_eq!(stats.active_ipos, 2);
    }

    // ========== round2 ==========

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(77.589), 77.59);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(-3.456), -3.46);
    }
}
