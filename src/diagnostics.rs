//! Injectable sinks for records dropped during validation.
//!
//! Validation never fails: a malformed record is reported to a
//! [`DiagnosticSink`] and skipped. Callers choose whether that report is
//! logged, collected for display, or discarded.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::RecordRejection;

/// One dropped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    /// Zero-based position in the raw input.
    pub index: usize,
    /// Record id, when it could be read.
    pub id: Option<i64>,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: RecordRejection,
}

fn serialize_reason<S>(reason: &RecordRejection, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&reason.to_string())
}

pub trait DiagnosticSink {
    fn report(&mut self, warning: ValidationWarning);
}

/// Forwards every warning to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, warning: ValidationWarning) {
        match warning.id {
            Some(id) => log::warn!(
                "Dropping record #{} (id {}): {}",
                warning.index,
                id,
                warning.reason
            ),
            None => log::warn!("Dropping record #{}: {}", warning.index, warning.reason),
        }
    }
}

/// Discards every warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _warning: ValidationWarning) {}
}

/// Keeps warnings in input order.
#[derive(Debug, Default, Clone)]
pub struct WarningCollector {
    warnings: Vec<ValidationWarning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ValidationWarning> {
        self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings per rejection code, sorted by code.
    pub fn counts_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for w in &self.warnings {
            *counts.entry(w.reason.code()).or_insert(0) += 1;
        }
        counts
    }
}

impl DiagnosticSink for WarningCollector {
    fn report(&mut self, warning: ValidationWarning) {
        log::debug!("Collected warning for record #{}: {}", warning.index, warning.reason);
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(index: usize, reason: RecordRejection) -> ValidationWarning {
        ValidationWarning {
            index,
            id: None,
            reason,
        }
    }

    #[test]
    fn test_collector_keeps_order_and_counts() {
        let mut sink = WarningCollector::new();
        sink.report(warning(3, RecordRejection::InvalidId));
        sink.report(warning(1, RecordRejection::MissingTimestamp));
        sink.report(warning(7, RecordRejection::InvalidId));

        assert_eq!(sink.len(), 3);
        let indexes: Vec<usize> = sink.warnings().iter().map(|w| w.index).collect();
        assert_eq!(indexes, vec![3, 1, 7]);

        let counts = sink.counts_by_reason();
        assert_eq!(counts.get("invalid_id"), Some(&2));
        assert_eq!(counts.get("missing_timestamp"), Some(&1));
    }

    #[test]
    fn test_null_and_log_sinks_accept_warnings() {
        NullSink.report(warning(0, RecordRejection::InvalidId));
        LogSink.report(ValidationWarning {
            index: 0,
            id: Some(12),
            reason: RecordRejection::InvalidTimestamp("2025-02-30".into()),
        });
    }

    #[test]
    fn test_warning_serializes_reason_as_text() {
        let json = serde_json::to_value(warning(2, RecordRejection::InvalidStatus)).unwrap();
        assert_eq!(json["index"], 2);
        assert_eq!(json["reason"], "status is missing or not an integer");
        assert!(json["id"].is_null());
    }
}
