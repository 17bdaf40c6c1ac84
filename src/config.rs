use crate::clock::parse_date_key;
use chrono::NaiveDate;
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub exam_date: NaiveDate,
}

impl Config {
    /// Reads `PORT`, `APP_DATA_DIR` and `EXAM_DATE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = lookup("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let exam_date = match lookup("EXAM_DATE") {
            Some(raw) => parse_date_key(&raw).unwrap_or_else(|| {
                warn!("EXAM_DATE {raw:?} is not YYYY-MM-DD, using the default");
                default_exam_date()
            }),
            None => default_exam_date(),
        };

        Self {
            port,
            data_dir,
            exam_date,
        }
    }
}

fn default_exam_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.exam_date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("APP_DATA_DIR", "/tmp/tracker"),
            ("EXAM_DATE", "2027-02-06"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tracker"));
        assert_eq!(config.exam_date, NaiveDate::from_ymd_opt(2027, 2, 6).unwrap());
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("EXAM_DATE", "soon")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.exam_date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }
}
