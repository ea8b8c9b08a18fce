use serde::{Deserialize, Serialize};

use crate::analyzer::period::PeriodKey;

/// Buddhist-era offset used by the Thai calendar (2025 CE = 2568 BE).
const BUDDHIST_ERA_OFFSET: i32 = 543;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLocale {
    Thai,
    English,
}

impl LabelLocale {
    /// "th", "th-TH", "thai" → Thai; "en", "en-US", "english" → English.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        match code.split(['-', '_']).next().unwrap_or("") {
            "th" | "thai" => Some(LabelLocale::Thai),
            "en" | "english" => Some(LabelLocale::English),
            _ => None,
        }
    }

    pub fn era_year(&self, year: i32) -> i32 {
        match self {
            LabelLocale::Thai => year + BUDDHIST_ERA_OFFSET,
            LabelLocale::English => year,
        }
    }
}

pub fn month_name(month: u32, locale: LabelLocale) -> &'static str {
    match locale {
        LabelLocale::Thai => match month {
            1 => "มกราคม",
            2 => "กุมภาพันธ์",
            3 => "มีนาคม",
            4 => "เมษายน",
            5 => "พฤษภาคม",
            6 => "มิถุนายน",
            7 => "กรกฎาคม",
            8 => "สิงหาคม",
            9 => "กันยายน",
            10 => "ตุลาคม",
            11 => "พฤศจิกายน",
            12 => "ธันวาคม",
            _ => "ไม่ทราบ",
        },
        LabelLocale::English => match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        },
    }
}

/// Axis label for yearly charts.
pub fn short_month_name(month: u32, locale: LabelLocale) -> &'static str {
    match locale {
        LabelLocale::Thai => match month {
            1 => "ม.ค.",
            2 => "ก.พ.",
            3 => "มี.ค.",
            4 => "เม.ย.",
            5 => "พ.ค.",
            6 => "มิ.ย.",
            7 => "ก.ค.",
            8 => "ส.ค.",
            9 => "ก.ย.",
            10 => "ต.ค.",
            11 => "พ.ย.",
            12 => "ธ.ค.",
            _ => "?",
        },
        LabelLocale::English => match month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "?",
        },
    }
}

/// "กุมภาพันธ์ 2568" / "February 2025"
pub fn month_label(year: i32, month: u32, locale: LabelLocale) -> String {
    format!("{} {}", month_name(month, locale), locale.era_year(year))
}

/// "พ.ศ. 2568" / "2025"
pub fn year_label(year: i32, locale: LabelLocale) -> String {
    match locale {
        LabelLocale::Thai => format!("พ.ศ. {}", locale.era_year(year)),
        LabelLocale::English => year.to_string(),
    }
}

pub fn period_label(key: &PeriodKey, locale: LabelLocale) -> String {
    match *key {
        PeriodKey::Month { year, month } => month_label(year, month, locale),
        PeriodKey::Year(year) => year_label(year, locale),
    }
}
