use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::diagnostics::{DiagnosticSink, LogSink, ValidationWarning};
use crate::error::RecordRejection;
use crate::parser::dates::normalize_date_within;
use crate::parser::types::{RawRecord, StatusCode, ValidatedRecord};

/// Validate a batch with the default config, logging every dropped record.
pub fn validate_all(raw_records: &[RawRecord]) -> Vec<ValidatedRecord> {
    validate_all_with(raw_records, &EngineConfig::default(), &mut LogSink)
}

/// Keep only well-formed records, in input order. Dropped records are
/// reported to `sink`; the batch is never aborted.
pub fn validate_all_with(
    raw_records: &[RawRecord],
    config: &EngineConfig,
    sink: &mut dyn DiagnosticSink,
) -> Vec<ValidatedRecord> {
    let mut validated = Vec::with_capacity(raw_records.len());

    for (index, raw) in raw_records.iter().enumerate() {
        match validate_record(raw, config) {
            Ok(record) => validated.push(record),
            Err(reason) => sink.report(ValidationWarning {
                index,
                id: raw.id.as_i64(),
                reason,
            }),
        }
    }

    log::debug!(
        "Validated {} of {} records",
        validated.len(),
        raw_records.len()
    );
    validated
}

pub fn validate_record(
    raw: &RawRecord,
    config: &EngineConfig,
) -> Result<ValidatedRecord, RecordRejection> {
    if let Some(reason) = &raw.unreadable {
        return Err(RecordRejection::Unreadable(reason.clone()));
    }

    // ID (required, integer)
    let id = raw.id.as_i64().ok_or(RecordRejection::InvalidId)?;

    // Status (required, integer)
    let status = raw.status.as_i64().ok_or(RecordRejection::InvalidStatus)?;

    // created_at (required, non-empty string)
    let created_at = raw
        .created_at
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .ok_or(RecordRejection::MissingTimestamp)?;
    let date = normalize_date_within(created_at, &config.year_bounds())
        .ok_or_else(|| RecordRejection::InvalidTimestamp(created_at.to_string()))?;

    // Dimension label (optional, blank → sentinel)
    let dimension_label = raw
        .dimension_label
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config.unspecified_label.clone());

    Ok(ValidatedRecord {
        id,
        date,
        dimension_label,
        status: StatusCode(status),
        attributes: collect_attributes(&raw.extra),
    })
}

/// Strings are kept trimmed, numbers and booleans as their JSON text.
fn collect_attributes(extra: &Map<String, Value>) -> BTreeMap<String, String> {
    extra
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}
