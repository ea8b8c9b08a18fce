use std::sync::LazyLock;

use regex::Regex;

use crate::config::YearBounds;
use crate::parser::types::CalendarDate;

// ASCII digits only: `\d` would also accept non-ASCII digits.
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

/// Normalise a raw timestamp into a calendar day, using the default year bounds.
///
/// Accepted: "2025-02-28 10:00:00", "2025-02-28T10:00:00Z" (or with offset), "2025-02-28".
/// Returns None for empty, malformed or impossible dates ("2025-02-30").
pub fn normalize_date(raw: &str) -> Option<CalendarDate> {
    normalize_date_within(raw, &YearBounds::default())
}

pub fn normalize_date_within(raw: &str, bounds: &YearBounds) -> Option<CalendarDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date_part = date_prefix(trimmed);
    if !ISO_DATE.is_match(date_part) {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[5..7].parse().ok()?;
    let day: u32 = date_part[8..10].parse().ok()?;

    if !bounds.contains(year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // chrono rejects days past the end of the month
    CalendarDate::from_ymd(year, month, day)
}

/// Date portion of a timestamp: text before the first space, else before the first 'T'.
fn date_prefix(s: &str) -> &str {
    if let Some((head, _)) = s.split_once(' ') {
        head
    } else if let Some((head, _)) = s.split_once('T') {
        head
    } else {
        s
    }
}
