//! Runtime settings.
//!
//! File locations come from the environment (a `.env` file is honored) and
//! fall back to the defaults in `consts`.

use std::{env, path::PathBuf};

use crate::consts::{DB_FILE_VAR, DEFAULT_DB_FILE, DEFAULT_LOG_FILE, LOG_FILE_VAR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path_or = |key: &str, default: &str| -> PathBuf {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
                .into()
        };

        Self {
            db_path: path_or(DB_FILE_VAR, DEFAULT_DB_FILE),
            log_path: path_or(LOG_FILE_VAR, DEFAULT_LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(settings.log_path, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(|key| match key {
            DB_FILE_VAR => Some("/tmp/records.json".to_owned()),
            LOG_FILE_VAR => Some("   ".to_owned()),
            _ => None,
        });
        assert_eq!(settings.db_path, PathBuf::from("/tmp/records.json"));
        assert_eq!(settings.log_path, PathBuf::from(DEFAULT_LOG_FILE));
    }
}
