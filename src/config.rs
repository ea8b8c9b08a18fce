use serde::{Deserialize, Serialize};

use crate::analyzer::labels::LabelLocale;
use crate::error::EngineError;

pub const DEFAULT_MIN_YEAR: i32 = 1900;
pub const DEFAULT_MAX_YEAR: i32 = 2200;
pub const UNSPECIFIED_LABEL: &str = "unspecified";

/// A named group of status codes, rendered as one `<dimension>_<name>` series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMetric {
    pub name: String,
    pub codes: Vec<i64>,
}

impl StatusMetric {
    pub fn new(name: impl Into<String>, codes: &[i64]) -> Self {
        Self {
            name: name.into(),
            codes: codes.to_vec(),
        }
    }

    pub fn matches(&self, status: i64) -> bool {
        self.codes.contains(&status)
    }
}

/// Inclusive sanity bounds applied to the year of every date and period key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_YEAR,
            max: DEFAULT_MAX_YEAR,
        }
    }
}

impl YearBounds {
    /// Every year a four-digit key can name.
    pub const ANY: YearBounds = YearBounds { min: 0, max: 9999 };

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub min_year: i32,
    pub max_year: i32,
    pub unspecified_label: String,
    pub locale: LabelLocale,
    pub status_metrics: Vec<StatusMetric>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            unspecified_label: UNSPECIFIED_LABEL.to_string(),
            locale: LabelLocale::Thai,
            status_metrics: vec![
                StatusMetric::new("pending", &[0]),
                StatusMetric::new("solved", &[1]),
            ],
        }
    }
}

impl EngineConfig {
    pub fn year_bounds(&self) -> YearBounds {
        YearBounds {
            min: self.min_year,
            max: self.max_year,
        }
    }

    /// Parses a JSON config object. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        if config.min_year > config.max_year {
            return Err(EngineError::InvalidConfig(format!(
                "minYear ({}) is greater than maxYear ({})",
                config.min_year, config.max_year
            )));
        }
        if config.unspecified_label.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "unspecifiedLabel must not be blank".to_string(),
            ));
        }
        Ok(config)
    }

    /// Builds a config from string key/value pairs (settings table rows).
    /// Unknown keys are ignored, unparseable values keep the default.
    pub fn from_key_values<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = EngineConfig::default();

        for (key, value) in pairs {
            match key {
                "min_year" => config.min_year = value.trim().parse().unwrap_or(DEFAULT_MIN_YEAR),
                "max_year" => config.max_year = value.trim().parse().unwrap_or(DEFAULT_MAX_YEAR),
                "unspecified_label" => {
                    if !value.trim().is_empty() {
                        config.unspecified_label = value.trim().to_string();
                    }
                }
                "locale" => {
                    if let Some(locale) = LabelLocale::from_code(value) {
                        config.locale = locale;
                    }
                }
                "status_metrics" => {
                    if let Ok(v) = serde_json::from_str(value) {
                        config.status_metrics = v;
                    }
                }
                _ => log::debug!("Ignoring unknown config key {:?}", key),
            }
        }

        if config.min_year > config.max_year {
            log::warn!(
                "Config year bounds inverted ({} > {}), using defaults",
                config.min_year,
                config.max_year
            );
            config.min_year = DEFAULT_MIN_YEAR;
            config.max_year = DEFAULT_MAX_YEAR;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.year_bounds(), YearBounds { min: 1900, max: 2200 });
        assert_eq!(config.unspecified_label, "unspecified");
        assert_eq!(config.locale, LabelLocale::Thai);
        assert_eq!(config.status_metrics.len(), 2);
        assert!(config.status_metrics[0].matches(0));
        assert!(config.status_metrics[1].matches(1));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json_str(r#"{"locale":"english","maxYear":2100}"#).unwrap();
        assert_eq!(config.locale, LabelLocale::English);
        assert_eq!(config.max_year, 2100);
        assert_eq!(config.min_year, 1900);
        assert_eq!(config.unspecified_label, "unspecified");
    }

    #[test]
    fn test_from_json_inverted_bounds() {
        match EngineConfig::from_json_str(r#"{"minYear":2300}"#) {
            Err(EngineError::InvalidConfig(msg)) => assert!(msg.contains("minYear")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            EngineConfig::from_json_str("{not json"),
            Err(EngineError::Json(_))
        ));
    }

    #[test]
    fn test_from_key_values() {
        let config = EngineConfig::from_key_values([
            ("min_year", "2000"),
            ("max_year", "abc"),
            ("locale", "en"),
            ("unspecified_label", "  ไม่ระบุ "),
            ("status_metrics", r#"[{"name":"open","codes":[0,2]}]"#),
            ("unknown", "x"),
        ]);
        assert_eq!(config.min_year, 2000);
        assert_eq!(config.max_year, 2200);
        assert_eq!(config.locale, LabelLocale::English);
        assert_eq!(config.unspecified_label, "ไม่ระบุ");
        assert_eq!(config.status_metrics, vec![StatusMetric::new("open", &[0, 2])]);
    }

    #[test]
    fn test_from_key_values_inverted_bounds_reset() {
        let config = EngineConfig::from_key_values([("min_year", "2500")]);
        assert_eq!(config.year_bounds(), YearBounds::default());
    }
}
