use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::YearBounds;
use crate::parser::types::{CalendarDate, ValidatedRecord};

static MONTH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("valid month key regex"));
static YEAR_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year key regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Year,
}

/// A selectable period: `YYYY-MM` or `YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl PeriodKey {
    /// Parse a key by shape alone: any four-digit year, months 1..=12.
    /// Year bounds belong to validation; use [`PeriodKey::parse_within`] to
    /// apply them again.
    pub fn parse(s: &str) -> Option<Self> {
        Self::parse_within(s, &YearBounds::ANY)
    }

    pub fn parse_within(s: &str, bounds: &YearBounds) -> Option<Self> {
        let key = if MONTH_KEY.is_match(s) {
            let year: i32 = s[0..4].parse().ok()?;
            let month: u32 = s[5..7].parse().ok()?;
            if !(1..=12).contains(&month) {
                return None;
            }
            PeriodKey::Month { year, month }
        } else if YEAR_KEY.is_match(s) {
            PeriodKey::Year(s.parse().ok()?)
        } else {
            return None;
        };

        if bounds.contains(key.year()) {
            Some(key)
        } else {
            None
        }
    }

    /// Parse a key and require the given granularity.
    pub fn parse_as(s: &str, granularity: Granularity, bounds: &YearBounds) -> Option<Self> {
        Self::parse_within(s, bounds).filter(|k| k.granularity() == granularity)
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            PeriodKey::Month { .. } => Granularity::Month,
            PeriodKey::Year(_) => Granularity::Year,
        }
    }

    pub fn year(&self) -> i32 {
        match *self {
            PeriodKey::Month { year, .. } => year,
            PeriodKey::Year(year) => year,
        }
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        date.period(self.granularity()) == *self
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            PeriodKey::Year(year) => write!(f, "{:04}", year),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Number of days in a month, from the day before the first of the next month.
/// None for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last_day = next_month_first - Duration::days(1);
    debug_assert!(last_day >= first);
    Some(last_day.day())
}

/// Every day of the month, ascending.
pub fn month_days(year: i32, month: u32) -> Vec<CalendarDate> {
    let Some(n) = days_in_month(year, month) else {
        return Vec::new();
    };
    (1..=n)
        .filter_map(|day| CalendarDate::from_ymd(year, month, day))
        .collect()
}

/// Period key of a caller-supplied "today". The engine never reads the clock.
pub fn current_period(today: NaiveDate, granularity: Granularity) -> String {
    CalendarDate::from(today).period(granularity).to_string()
}

/// Records whose date falls in `period` (`YYYY-MM` or `YYYY`).
/// A malformed period yields an empty list.
pub fn filter_by_period(records: &[ValidatedRecord], period: &str) -> Vec<ValidatedRecord> {
    match PeriodKey::parse(period) {
        Some(key) => filter_by_key(records, &key),
        None => {
            log::debug!("Ignoring malformed period key {:?}", period);
            Vec::new()
        }
    }
}

/// Same as [`filter_by_period`] but a key of the wrong granularity matches nothing.
pub fn filter_by_period_as(
    records: &[ValidatedRecord],
    period: &str,
    granularity: Granularity,
    bounds: &YearBounds,
) -> Vec<ValidatedRecord> {
    match PeriodKey::parse_as(period, granularity, bounds) {
        Some(key) => filter_by_key(records, &key),
        None => Vec::new(),
    }
}

pub fn filter_by_key(records: &[ValidatedRecord], key: &PeriodKey) -> Vec<ValidatedRecord> {
    records
        .iter()
        .filter(|r| key.contains(&r.date))
        .cloned()
        .collect()
}
