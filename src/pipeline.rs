//! Chart pipeline: one call from raw API records to a ready-to-render payload.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::aggregate::{aggregate, aggregate_by_month};
use crate::analyzer::catalog::{build_catalog, select_default, PeriodOption};
use crate::analyzer::period::{filter_by_key, Granularity, PeriodKey};
use crate::analyzer::series::{
    materialize_daily_with, materialize_yearly_with, metric_names, DenseSeriesPoint,
    SeriesMetric,
};
use crate::analyzer::summary::{
    percentage_breakdown_with, totals_by_dimension_for, BreakdownEntry, GroupField,
};
use crate::config::EngineConfig;
use crate::diagnostics::DiagnosticSink;
use crate::parser::types::RawRecord;
use crate::parser::validate::validate_all_with;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub granularity: Granularity,
    /// Explicit selection; falls back to the default-selection rule when absent or invalid.
    #[serde(default)]
    pub period: Option<String>,
    /// Wall-clock period supplied by the caller.
    #[serde(default)]
    pub current_period: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metric: SeriesMetric,
    /// Field name for the percentage breakdown, e.g. "program_name".
    #[serde(default)]
    pub breakdown_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub catalog: Vec<PeriodOption>,
    pub selected: Option<String>,
    pub series: Vec<DenseSeriesPoint>,
    /// Per dimension, the sum of every field the series charts for it.
    /// Records whose status no configured metric matches are not counted.
    pub totals: BTreeMap<String, u64>,
    pub breakdown: Vec<BreakdownEntry>,
    pub valid_records: usize,
    pub dropped_records: usize,
}

pub fn build_chart(
    raw_records: &[RawRecord],
    request: &ChartRequest,
    config: &EngineConfig,
    sink: &mut dyn DiagnosticSink,
) -> ChartPayload {
    let records = validate_all_with(raw_records, config, sink);
    let catalog = build_catalog(&records, request.granularity, config.locale);
    let bounds = config.year_bounds();

    // Explicit period first, then the default-selection rule
    let selected: Option<PeriodKey> = request
        .period
        .as_deref()
        .and_then(|p| PeriodKey::parse_as(p, request.granularity, &bounds))
        .or_else(|| {
            select_default(&catalog, request.current_period.as_deref())
                .and_then(|o| PeriodKey::parse_as(&o.value, request.granularity, &bounds))
        });

    let mut payload = ChartPayload {
        catalog,
        selected: selected.map(|k| k.to_string()),
        series: Vec::new(),
        totals: BTreeMap::new(),
        breakdown: Vec::new(),
        valid_records: records.len(),
        dropped_records: raw_records.len() - records.len(),
    };

    let Some(key) = selected else {
        log::debug!("No period available, returning empty chart");
        return payload;
    };

    let filtered = filter_by_key(&records, &key);
    let period = key.to_string();

    payload.series = match request.granularity {
        Granularity::Month => materialize_daily_with(
            &aggregate(&filtered),
            &period,
            &request.dimensions,
            request.metric,
            config,
        ),
        Granularity::Year => materialize_yearly_with(
            &aggregate_by_month(&filtered),
            &period,
            &request.dimensions,
            request.metric,
            config,
        ),
    };

    payload.totals = charted_totals(&payload.series, &request.dimensions, request.metric, config);

    if let Some(field) = request.breakdown_by.as_deref() {
        payload.breakdown = percentage_breakdown_with(
            &filtered,
            &GroupField::from_name(field),
            &config.unspecified_label,
        );
    }

    log::debug!(
        "Chart for {}: {} points, {} records in period",
        period,
        payload.series.len(),
        filtered.len()
    );
    payload
}

fn charted_totals(
    series: &[DenseSeriesPoint],
    dimensions: &[String],
    metric: SeriesMetric,
    config: &EngineConfig,
) -> BTreeMap<String, u64> {
    let mut totals: BTreeMap<String, u64> = dimensions.iter().map(|d| (d.clone(), 0)).collect();
    for name in metric_names(metric, config) {
        for (dim, n) in totals_by_dimension_for(series, dimensions, &name) {
            *totals.entry(dim).or_insert(0) += n;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningCollector;
    use crate::parser::ingest::parse_raw_records;

    fn raw() -> Vec<RawRecord> {
        parse_raw_records(
            r#"[
                {"id":1,"created_at":"2025-02-03 08:00:00","branch_name":"HQ","status":0,"program_name":"ERP"},
                {"id":2,"created_at":"2025-02-03T09:00:00Z","branch_name":"North","status":1,"program_name":"ERP"},
                {"id":3,"created_at":"2025-02-20","branch_name":"HQ","status":1,"program_name":"CRM"},
                {"id":4,"created_at":"2025-01-15","branch_name":"HQ","status":0},
                {"id":5,"created_at":"2025-02-30","branch_name":"HQ","status":0},
                {"id":"x","created_at":"2025-02-01","status":0}
            ]"#,
        )
        .unwrap()
    }

    fn request(granularity: Granularity) -> ChartRequest {
        ChartRequest {
            granularity,
            period: None,
            current_period: None,
            dimensions: vec!["HQ".into(), "North".into(), "South".into()],
            metric: SeriesMetric::Total,
            breakdown_by: Some("program_name".into()),
        }
    }

    #[test]
    fn test_monthly_chart_defaults_to_newest() {
        let mut sink = WarningCollector::new();
        let chart = build_chart(&raw(), &request(Granularity::Month), &EngineConfig::default(), &mut sink);

        assert_eq!(chart.valid_records, 4);
        assert_eq!(chart.dropped_records, 2);
        assert_eq!(sink.len(), 2);

        assert_eq!(chart.selected.as_deref(), Some("2025-02"));
        assert_eq!(chart.catalog.len(), 2);
        assert_eq!(chart.series.len(), 28);
        assert_eq!(chart.series[2].value("HQ_total"), 1);
        assert_eq!(chart.series[2].value("North_total"), 1);
        assert_eq!(chart.totals.get("HQ"), Some(&2));
        assert_eq!(chart.totals.get("South"), Some(&0));

        assert_eq!(chart.breakdown[0].label, "ERP");
        assert_eq!(chart.breakdown[0].percentage, 67);
        assert_eq!(chart.breakdown[1].label, "CRM");
    }

    #[test]
    fn test_current_period_wins_when_present() {
        let mut req = request(Granularity::Month);
        req.current_period = Some("2025-01".into());
        let chart = build_chart(&raw(), &req, &EngineConfig::default(), &mut WarningCollector::new());
        assert_eq!(chart.selected.as_deref(), Some("2025-01"));
        assert_eq!(chart.series.len(), 31);
        assert_eq!(chart.totals.get("HQ"), Some(&1));
        assert_eq!(chart.breakdown[0].label, "unspecified");
    }

    #[test]
    fn test_explicit_period_without_data_is_zero_filled() {
        let mut req = request(Granularity::Month);
        req.period = Some("2024-02".into());
        let chart = build_chart(&raw(), &req, &EngineConfig::default(), &mut WarningCollector::new());
        assert_eq!(chart.selected.as_deref(), Some("2024-02"));
        assert_eq!(chart.series.len(), 29);
        assert!(chart.totals.values().all(|&n| n == 0));
        assert!(chart.breakdown.is_empty());
    }

    #[test]
    fn test_explicit_period_of_wrong_granularity_falls_back() {
        let mut req = request(Granularity::Month);
        req.period = Some("2025".into());
        let chart = build_chart(&raw(), &req, &EngineConfig::default(), &mut WarningCollector::new());
        assert_eq!(chart.selected.as_deref(), Some("2025-02"));
    }

    #[test]
    fn test_yearly_chart_by_status() {
        let mut req = request(Granularity::Year);
        req.metric = SeriesMetric::ByStatus;
        let chart = build_chart(&raw(), &req, &EngineConfig::default(), &mut WarningCollector::new());
        assert_eq!(chart.selected.as_deref(), Some("2025"));
        assert_eq!(chart.series.len(), 12);
        assert_eq!(chart.series[1].value("HQ_pending"), 1);
        assert_eq!(chart.series[1].value("HQ_solved"), 1);
        assert_eq!(chart.series[0].value("HQ_pending"), 1);
        assert_eq!(chart.totals.get("HQ"), Some(&3));
        assert_eq!(chart.totals.get("North"), Some(&1));
    }

    #[test]
    fn test_by_status_totals_skip_uncharted_statuses() {
        let raw = parse_raw_records(
            r#"[
                {"id":1,"created_at":"2025-02-03","branch_name":"HQ","status":0},
                {"id":2,"created_at":"2025-02-04","branch_name":"HQ","status":1},
                {"id":3,"created_at":"2025-02-05","branch_name":"HQ","status":2}
            ]"#,
        )
        .unwrap();
        let mut req = request(Granularity::Month);
        req.metric = SeriesMetric::ByStatus;
        let chart = build_chart(&raw, &req, &EngineConfig::default(), &mut WarningCollector::new());
        assert_eq!(chart.valid_records, 3);
        assert_eq!(chart.totals.get("HQ"), Some(&2));
        let charted: u64 = chart
            .series
            .iter()
            .map(|p| p.value("HQ_pending") + p.value("HQ_solved"))
            .sum();
        assert_eq!(charted, 2);
        assert_eq!(chart.totals.get("South"), Some(&0));
    }

    #[test]
    fn test_no_records_no_selection() {
        let chart = build_chart(&[], &request(Granularity::Month), &EngineConfig::default(), &mut WarningCollector::new());
        assert!(chart.catalog.is_empty());
        assert!(chart.selected.is_none());
        assert!(chart.series.is_empty());
        assert!(chart.totals.is_empty());
        assert!(chart.breakdown.is_empty());
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: ChartRequest =
            serde_json::from_str(r#"{"granularity":"year","dimensions":["HQ"],"metric":"by_status"}"#)
                .unwrap();
        assert_eq!(req.granularity, Granularity::Year);
        assert_eq!(req.metric, SeriesMetric::ByStatus);
        assert!(req.period.is_none());
        assert!(req.breakdown_by.is_none());
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let chart = build_chart(&raw(), &request(Granularity::Month), &EngineConfig::default(), &mut WarningCollector::new());
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["selected"], "2025-02");
        assert_eq!(json["catalog"][0]["recordCount"], 3);
        assert_eq!(json["series"][2]["HQ_total"], 1);
        assert_eq!(json["droppedRecords"], 2);
    }
}
