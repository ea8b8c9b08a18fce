use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::analyzer::period::{Granularity, PeriodKey};

/// Keys that may carry the dimension label, highest priority first.
pub const DIMENSION_KEYS: [&str; 3] = ["dimension_label", "branch_name", "branch"];

/// A ticket record as received from the REST API. Nothing is trusted yet:
/// every field is kept as raw JSON and checked by the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPayload")]
pub struct RawRecord {
    pub id: Value,
    pub created_at: Value,
    pub dimension_label: Value,
    pub status: Value,
    /// Every other field of the payload (program name, system name, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Set when the payload entry could not be read as an object at all.
    #[serde(skip)]
    pub unreadable: Option<String>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    created_at: Value,
    #[serde(default)]
    status: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawPayload> for RawRecord {
    fn from(payload: RawPayload) -> Self {
        let RawPayload {
            id,
            created_at,
            status,
            mut extra,
        } = payload;
        let dimension_label = take_dimension_label(&mut extra);
        RawRecord {
            id,
            created_at,
            dimension_label,
            status,
            extra,
            unreadable: None,
        }
    }
}

fn is_label(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// First non-blank string among [`DIMENSION_KEYS`]. The canonical key always
/// leaves `extra`; a fallback key only when its value is taken.
fn take_dimension_label(extra: &mut Map<String, Value>) -> Value {
    let canonical = extra.remove(DIMENSION_KEYS[0]).unwrap_or(Value::Null);
    if is_label(&canonical) {
        return canonical;
    }
    let fallback = DIMENSION_KEYS[1..]
        .iter()
        .copied()
        .find(|key| extra.get(*key).is_some_and(is_label));
    match fallback {
        Some(key) => extra.remove(key).unwrap_or(canonical),
        None => canonical,
    }
}

impl RawRecord {
    pub fn new(id: i64, created_at: &str, dimension_label: Option<&str>, status: i64) -> Self {
        RawRecord {
            id: Value::from(id),
            created_at: Value::from(created_at),
            dimension_label: dimension_label.map(Value::from).unwrap_or(Value::Null),
            status: Value::from(status),
            extra: Map::new(),
            unreadable: None,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.extra.insert(key.to_string(), Value::from(value));
        self
    }

    /// Lenient conversion: an entry that is not an object becomes an empty
    /// record marked unreadable, which the validator then drops.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                serde_json::from_value(Value::Object(map)).unwrap_or_else(|err| {
                    log::warn!("Unreadable record object: {}", err);
                    RawRecord::unreadable(err.to_string())
                })
            }
            other => RawRecord::unreadable(format!("expected an object, got {}", json_kind(&other))),
        }
    }

    fn unreadable(reason: String) -> Self {
        RawRecord {
            unreadable: Some(reason),
            ..RawRecord::default()
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A real Gregorian calendar day, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// `YYYY-MM`
    pub fn month_key(&self) -> String {
        PeriodKey::Month {
            year: self.year(),
            month: self.month(),
        }
        .to_string()
    }

    /// `YYYY`
    pub fn year_key(&self) -> String {
        PeriodKey::Year(self.year()).to_string()
    }

    pub fn period(&self, granularity: Granularity) -> PeriodKey {
        match granularity {
            Granularity::Month => PeriodKey::Month {
                year: self.year(),
                month: self.month(),
            },
            Granularity::Year => PeriodKey::Year(self.year()),
        }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub i64);

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRecord {
    pub id: i64,
    pub date: CalendarDate,
    pub dimension_label: String,
    pub status: StatusCode,
    /// Free-form string attributes carried over from the raw payload.
    pub attributes: BTreeMap<String, String>,
}

/// Entry of the externally supplied dimension catalog (e.g. branches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: i64,
    pub name: String,
}

/// Dimension names in catalog order, trimmed, without blanks or duplicates.
pub fn dimension_labels(catalog: &[Dimension]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(catalog.len());
    for d in catalog {
        let name = d.name.trim();
        if name.is_empty() || labels.iter().any(|l| l == name) {
            continue;
        }
        labels.push(name.to_string());
    }
    labels
}
