use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::StatusMetric;
use crate::parser::types::{StatusCode, ValidatedRecord};

pub type StatusCounts = BTreeMap<StatusCode, u64>;

/// Sparse counts keyed by unit (a date or a month key), then dimension, then status.
///
/// A (unit, dimension) pair with no records has no entry at all, so "no data"
/// stays distinguishable from a zero count until the series is densified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Aggregation {
    buckets: BTreeMap<String, BTreeMap<String, StatusCounts>>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Units that have at least one record, ascending.
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn get(&self, unit: &str, dimension: &str) -> Option<&StatusCounts> {
        self.buckets.get(unit)?.get(dimension)
    }

    pub fn contains(&self, unit: &str, dimension: &str) -> bool {
        self.get(unit, dimension).is_some()
    }

    pub fn count(&self, unit: &str, dimension: &str, status: StatusCode) -> u64 {
        self.get(unit, dimension)
            .and_then(|c| c.get(&status))
            .copied()
            .unwrap_or(0)
    }

    /// Σ over all statuses.
    pub fn total_per(&self, unit: &str, dimension: &str) -> u64 {
        self.get(unit, dimension)
            .map(|c| c.values().sum())
            .unwrap_or(0)
    }

    /// Σ over the statuses grouped under `metric`.
    pub fn count_matching(&self, unit: &str, dimension: &str, metric: &StatusMetric) -> u64 {
        self.get(unit, dimension)
            .map(|c| {
                c.iter()
                    .filter(|(status, _)| metric.matches(status.0))
                    .map(|(_, n)| *n)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Σ of every count.
    pub fn grand_total(&self) -> u64 {
        self.buckets
            .values()
            .flat_map(|dims| dims.values())
            .flat_map(|counts| counts.values())
            .sum()
    }

    fn increment(&mut self, unit: String, record: &ValidatedRecord) {
        *self
            .buckets
            .entry(unit)
            .or_default()
            .entry(record.dimension_label.clone())
            .or_default()
            .entry(record.status)
            .or_insert(0) += 1;
    }
}

/// Counts per (date, dimension, status).
pub fn aggregate(records: &[ValidatedRecord]) -> Aggregation {
    let mut agg = Aggregation::default();
    for r in records {
        agg.increment(r.date.to_string(), r);
    }
    agg
}

/// Counts per (`YYYY-MM`, dimension, status), for yearly series.
pub fn aggregate_by_month(records: &[ValidatedRecord]) -> Aggregation {
    let mut agg = Aggregation::default();
    for r in records {
        agg.increment(r.date.month_key(), r);
    }
    agg
}
