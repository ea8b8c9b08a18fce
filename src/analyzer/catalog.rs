use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyzer::labels::{period_label, LabelLocale};
use crate::analyzer::period::{Granularity, PeriodKey};
use crate::parser::types::ValidatedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOption {
    pub value: String,
    pub label: String,
    pub record_count: usize,
}

/// Months present in `records`, newest first, with Thai labels.
pub fn build_month_catalog(records: &[ValidatedRecord]) -> Vec<PeriodOption> {
    build_catalog(records, Granularity::Month, LabelLocale::Thai)
}

/// Years present in `records`, newest first, with Thai labels.
pub fn build_year_catalog(records: &[ValidatedRecord]) -> Vec<PeriodOption> {
    build_catalog(records, Granularity::Year, LabelLocale::Thai)
}

/// One option per distinct period, sorted by key descending.
/// Every option has at least one record; counts sum to `records.len()`.
pub fn build_catalog(
    records: &[ValidatedRecord],
    granularity: Granularity,
    locale: LabelLocale,
) -> Vec<PeriodOption> {
    let mut counts: BTreeMap<PeriodKey, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.date.period(granularity)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .rev()
        .map(|(key, record_count)| PeriodOption {
            value: key.to_string(),
            label: period_label(&key, locale),
            record_count,
        })
        .collect()
}

/// The entry matching `current`, else the newest entry. None for an empty catalog.
pub fn select_default<'a>(
    catalog: &'a [PeriodOption],
    current: Option<&str>,
) -> Option<&'a PeriodOption> {
    current
        .and_then(|c| catalog.iter().find(|o| o.value == c))
        .or_else(|| catalog.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{validate_all, RawRecord};

    fn records(dates: &[&str]) -> Vec<ValidatedRecord> {
        let raw: Vec<RawRecord> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| RawRecord::new(i as i64 + 1, d, Some("HQ"), 0))
            .collect();
        validate_all(&raw)
    }

    #[test]
    fn test_month_catalog_sorted_desc_with_counts() {
        let recs = records(&[
            "2025-01-05",
            "2025-03-01 00:00:00",
            "2024-12-31",
            "2025-03-15T08:00:00Z",
            "2025-01-20",
        ]);
        let catalog = build_month_catalog(&recs);
        let values: Vec<&str> = catalog.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["2025-03", "2025-01", "2024-12"]);
        let counts: Vec<usize> = catalog.iter().map(|o| o.record_count).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert_eq!(catalog[0].label, "มีนาคม 2568");
        assert_eq!(catalog.iter().map(|o| o.record_count).sum::<usize>(), recs.len());
    }

    #[test]
    fn test_year_catalog() {
        let recs = records(&["2023-05-01", "2025-01-01", "2025-12-31"]);
        let catalog = build_year_catalog(&recs);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].value, "2025");
        assert_eq!(catalog[0].record_count, 2);
        assert_eq!(catalog[0].label, "พ.ศ. 2568");
        assert_eq!(catalog[1].value, "2023");
    }

    #[test]
    fn test_english_labels() {
        let recs = records(&["2025-02-01"]);
        let catalog = build_catalog(&recs, Granularity::Month, LabelLocale::English);
        assert_eq!(catalog[0].label, "February 2025");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(build_month_catalog(&[]).is_empty());
        assert!(build_year_catalog(&[]).is_empty());
        assert!(select_default(&[], Some("2025-01")).is_none());
        assert!(select_default(&[], None).is_none());
    }

    #[test]
    fn test_select_default() {
        let recs = records(&["2025-01-05", "2025-03-01", "2024-12-31"]);
        let catalog = build_month_catalog(&recs);

        let current = select_default(&catalog, Some("2025-01")).unwrap();
        assert_eq!(current.value, "2025-01");

        // current period has no data → newest
        let fallback = select_default(&catalog, Some("2025-10")).unwrap();
        assert_eq!(fallback.value, "2025-03");

        assert_eq!(select_default(&catalog, None).unwrap().value, "2025-03");
    }
}
