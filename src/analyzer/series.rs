use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::aggregate::Aggregation;
use crate::analyzer::labels::{short_month_name, LabelLocale};
use crate::analyzer::period::{month_days, Granularity, PeriodKey};
use crate::config::EngineConfig;

pub const TOTAL_METRIC: &str = "total";

/// Which fields each point carries per dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMetric {
    /// `<dimension>_total`
    #[default]
    Total,
    /// One `<dimension>_<name>` field per configured status metric.
    ByStatus,
}

/// One x-axis unit of a chart: a day of the month, or a month of the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenseSeriesPoint {
    /// `YYYY-MM-DD` (daily) or `YYYY-MM` (yearly).
    pub unit: String,
    /// Day of month, or month number.
    pub unit_ordinal: u32,
    pub unit_label: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, u64>,
}

impl DenseSeriesPoint {
    pub fn value(&self, field: &str) -> u64 {
        self.values.get(field).copied().unwrap_or(0)
    }
}

pub fn field_name(dimension: &str, metric: &str) -> String {
    format!("{}_{}", dimension, metric)
}

/// Metric suffixes produced for `metric` under `config`.
pub fn metric_names(metric: SeriesMetric, config: &EngineConfig) -> Vec<String> {
    match metric {
        SeriesMetric::Total => vec![TOTAL_METRIC.to_string()],
        SeriesMetric::ByStatus => config
            .status_metrics
            .iter()
            .map(|m| m.name.clone())
            .collect(),
    }
}

/// One `<dimension>_total` point per day of `period` (`YYYY-MM`).
/// The key is checked by shape only; the records behind `aggregated` were
/// already bounded by the validator.
pub fn materialize_daily(
    aggregated: &Aggregation,
    period: &str,
    dimensions: &[String],
) -> Vec<DenseSeriesPoint> {
    match PeriodKey::parse(period) {
        Some(PeriodKey::Month { year, month }) => daily_series(
            aggregated,
            year,
            month,
            dimensions,
            SeriesMetric::Total,
            &EngineConfig::default(),
        ),
        _ => {
            log::debug!("No daily series for period {:?}", period);
            Vec::new()
        }
    }
}

/// Every day of the month in ascending order, zero-filled for every dimension.
/// Empty when `period` is not a month key within the configured years or
/// `dimensions` is empty.
pub fn materialize_daily_with(
    aggregated: &Aggregation,
    period: &str,
    dimensions: &[String],
    metric: SeriesMetric,
    config: &EngineConfig,
) -> Vec<DenseSeriesPoint> {
    match PeriodKey::parse_as(period, Granularity::Month, &config.year_bounds()) {
        Some(PeriodKey::Month { year, month }) => {
            daily_series(aggregated, year, month, dimensions, metric, config)
        }
        _ => {
            log::debug!("No daily series for period {:?}", period);
            Vec::new()
        }
    }
}

fn daily_series(
    aggregated: &Aggregation,
    year: i32,
    month: u32,
    dimensions: &[String],
    metric: SeriesMetric,
    config: &EngineConfig,
) -> Vec<DenseSeriesPoint> {
    if dimensions.is_empty() {
        return Vec::new();
    }

    month_days(year, month)
        .into_iter()
        .map(|date| {
            let unit = date.to_string();
            let values = point_values(aggregated, &unit, dimensions, metric, config);
            DenseSeriesPoint {
                unit,
                unit_ordinal: date.day(),
                unit_label: format!("{:02}", date.day()),
                values,
            }
        })
        .collect()
}

/// Twelve `<dimension>_total` points for `year` (`YYYY`), Thai axis labels.
pub fn materialize_yearly(
    aggregated_by_month: &Aggregation,
    year: &str,
    dimensions: &[String],
) -> Vec<DenseSeriesPoint> {
    match PeriodKey::parse(year) {
        Some(PeriodKey::Year(y)) => yearly_series(
            aggregated_by_month,
            y,
            dimensions,
            SeriesMetric::Total,
            &EngineConfig::default(),
        ),
        _ => {
            log::debug!("No yearly series for year {:?}", year);
            Vec::new()
        }
    }
}

/// Months 1..=12 regardless of which months have data.
/// Empty when `year_key` is not a year within the configured bounds or
/// `dimensions` is empty.
pub fn materialize_yearly_with(
    aggregated_by_month: &Aggregation,
    year_key: &str,
    dimensions: &[String],
    metric: SeriesMetric,
    config: &EngineConfig,
) -> Vec<DenseSeriesPoint> {
    match PeriodKey::parse_as(year_key, Granularity::Year, &config.year_bounds()) {
        Some(PeriodKey::Year(year)) => {
            yearly_series(aggregated_by_month, year, dimensions, metric, config)
        }
        _ => {
            log::debug!("No yearly series for year {:?}", year_key);
            Vec::new()
        }
    }
}

fn yearly_series(
    aggregated_by_month: &Aggregation,
    year: i32,
    dimensions: &[String],
    metric: SeriesMetric,
    config: &EngineConfig,
) -> Vec<DenseSeriesPoint> {
    if dimensions.is_empty() {
        return Vec::new();
    }

    (1..=12u32)
        .map(|month| {
            let unit = PeriodKey::Month { year, month }.to_string();
            let values = point_values(aggregated_by_month, &unit, dimensions, metric, config);
            DenseSeriesPoint {
                unit,
                unit_ordinal: month,
                unit_label: axis_month_label(month, config.locale),
                values,
            }
        })
        .collect()
}

fn axis_month_label(month: u32, locale: LabelLocale) -> String {
    short_month_name(month, locale).to_string()
}

fn point_values(
    aggregated: &Aggregation,
    unit: &str,
    dimensions: &[String],
    metric: SeriesMetric,
    config: &EngineConfig,
) -> BTreeMap<String, u64> {
    let mut values = BTreeMap::new();
    for dim in dimensions {
        match metric {
            SeriesMetric::Total => {
                values.insert(
                    field_name(dim, TOTAL_METRIC),
                    aggregated.total_per(unit, dim),
                );
            }
            SeriesMetric::ByStatus => {
                for status_metric in &config.status_metrics {
                    values.insert(
                        field_name(dim, &status_metric.name),
                        aggregated.count_matching(unit, dim, status_metric),
                    );
                }
            }
        }
    }
    values
}
