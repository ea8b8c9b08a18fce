use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::analyzer::series::{field_name, DenseSeriesPoint, TOTAL_METRIC};
use crate::config::UNSPECIFIED_LABEL;
use crate::parser::types::ValidatedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub value: usize,
    pub percentage: u32,
}

/// Field a breakdown groups on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupField {
    Dimension,
    Status,
    /// Normalised `YYYY-MM-DD` date.
    Date,
    Id,
    /// A free-form attribute of the raw payload, e.g. `program_name`.
    Attribute(String),
}

impl GroupField {
    /// Record fields map to their variant ("created_at" groups by normalised
    /// date); anything else names an attribute.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dimension_label" | "branch_name" | "branch" => GroupField::Dimension,
            "status" => GroupField::Status,
            "created_at" | "date" => GroupField::Date,
            "id" => GroupField::Id,
            other => GroupField::Attribute(other.to_string()),
        }
    }

    fn label_of(&self, record: &ValidatedRecord) -> Option<String> {
        match self {
            GroupField::Dimension => Some(record.dimension_label.clone()),
            GroupField::Status => Some(record.status.to_string()),
            GroupField::Date => Some(record.date.to_string()),
            GroupField::Id => Some(record.id.to_string()),
            GroupField::Attribute(key) => record.attributes.get(key).cloned(),
        }
    }
}

/// Σ of `<dimension>_total` over the series, per dimension (badge counts).
pub fn totals_by_dimension(
    series: &[DenseSeriesPoint],
    dimensions: &[String],
) -> BTreeMap<String, u64> {
    totals_by_dimension_for(series, dimensions, TOTAL_METRIC)
}

/// Σ of `<dimension>_<metric>` over the series, per dimension.
pub fn totals_by_dimension_for(
    series: &[DenseSeriesPoint],
    dimensions: &[String],
    metric: &str,
) -> BTreeMap<String, u64> {
    dimensions
        .iter()
        .map(|dim| {
            let field = field_name(dim, metric);
            let total = series.iter().map(|p| p.value(&field)).sum();
            (dim.clone(), total)
        })
        .collect()
}

/// Record count per declared dimension; undeclared dimensions are ignored.
pub fn totals_from_records(
    records: &[ValidatedRecord],
    dimensions: &[String],
) -> BTreeMap<String, u64> {
    let mut totals: BTreeMap<String, u64> = dimensions.iter().map(|d| (d.clone(), 0)).collect();
    for r in records {
        if let Some(n) = totals.get_mut(&r.dimension_label) {
            *n += 1;
        }
    }
    totals
}

/// `round(100 * count / total)`, halves rounded up. 0 when `total` is 0.
pub fn round_half_up_percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (count as u128, total as u128);
    ((200 * count + total) / (2 * total)) as u32
}

pub fn percentage_breakdown(
    records: &[ValidatedRecord],
    group_by: &GroupField,
) -> Vec<BreakdownEntry> {
    percentage_breakdown_with(records, group_by, UNSPECIFIED_LABEL)
}

/// Count per label, largest first (ties by label), each share rounded on its own.
/// The percentages need not sum to exactly 100.
pub fn percentage_breakdown_with(
    records: &[ValidatedRecord],
    group_by: &GroupField,
    unspecified_label: &str,
) -> Vec<BreakdownEntry> {
    let total = records.len();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for r in records {
        let label = group_by
            .label_of(r)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| unspecified_label.to_string());
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut entries: Vec<BreakdownEntry> = counts
        .into_iter()
        .map(|(label, value)| BreakdownEntry {
            label,
            value,
            percentage: round_half_up_percentage(value, total),
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    entries
}
