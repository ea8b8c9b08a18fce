//! Calendar-complete time-series aggregation for ticket dashboards.
//!
//! Raw ticket records (free-form timestamp, branch label, status code) go in;
//! period catalogs, gap-free daily/monthly series and summary breakdowns come
//! out. Every operation is a pure, synchronous transform of its inputs.

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod pipeline;

pub use analyzer::{
    aggregate, aggregate_by_month, build_month_catalog, build_year_catalog, filter_by_period,
    materialize_daily, materialize_yearly, percentage_breakdown, select_default,
    totals_by_dimension, Aggregation, BreakdownEntry, DenseSeriesPoint, Granularity, GroupField,
    PeriodKey, PeriodOption, SeriesMetric,
};
pub use config::EngineConfig;
pub use diagnostics::{DiagnosticSink, LogSink, NullSink, ValidationWarning, WarningCollector};
pub use error::{EngineError, RecordRejection};
pub use parser::{
    normalize_date, parse_raw_records, validate_all, validate_all_with, CalendarDate, Dimension,
    RawRecord, StatusCode, ValidatedRecord,
};
pub use pipeline::{build_chart, ChartPayload, ChartRequest};

// ─── E2E Scenario Tests ─────────────────────────────────────────────────────


// ─── Property Tests ─────────────────────────────────────────────────────────
