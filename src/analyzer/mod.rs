pub mod aggregate;
pub mod catalog;
pub mod labels;
pub mod period;
pub mod series;
pub mod summary;

pub use aggregate::{aggregate, aggregate_by_month, Aggregation, StatusCounts};
pub use catalog::{
    build_catalog, build_month_catalog, build_year_catalog, select_default, PeriodOption,
};
pub use labels::LabelLocale;
pub use period::{
    current_period, days_in_month, filter_by_period, filter_by_period_as, Granularity, PeriodKey,
};
pub use series::{
    materialize_daily, materialize_daily_with, materialize_yearly, materialize_yearly_with,
    DenseSeriesPoint, SeriesMetric,
};
pub use summary::{
    percentage_breakdown, percentage_breakdown_with, totals_by_dimension,
    totals_by_dimension_for, totals_from_records, BreakdownEntry, GroupField,
};
