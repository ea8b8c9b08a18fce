use serde_json::Value;

use crate::error::EngineError;
use crate::parser::types::{json_kind, RawRecord};

/// Parse a REST payload into raw records.
///
/// Accepts a bare JSON array or an envelope object carrying a `data` array.
/// Array elements are not checked here; the validator drops the bad ones.
pub fn parse_raw_records(json: &str) -> Result<Vec<RawRecord>, EngineError> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
}

pub fn records_from_value(value: Value) -> Result<Vec<RawRecord>, EngineError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(EngineError::UnexpectedShape(format!(
                    "`data` must be an array, got {}",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(EngineError::UnexpectedShape(
                    "object payload without a `data` array".to_string(),
                ))
            }
        },
        other => {
            return Err(EngineError::UnexpectedShape(format!(
                "expected an array or an object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(items.into_iter().map(RawRecord::from_value).collect())
}
