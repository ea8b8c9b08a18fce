pub mod dates;
pub mod ingest;
pub mod types;
pub mod validate;

pub use dates::{normalize_date, normalize_date_within};
pub use ingest::{parse_raw_records, records_from_value};
pub use types::{
    dimension_labels, CalendarDate, Dimension, RawRecord, StatusCode, ValidatedRecord,
};
pub use validate::{validate_all, validate_all_with, validate_record};
