//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level.
//!
//! # Invariants
//! - Precedence is explicit override, then environment, then default.
//! - Blank environment values are ignored.
//! - Resolved `log_dir` is absolute.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "INVOICELY_DB_PATH";
pub const LOG_DIR_ENV: &str = "INVOICELY_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "INVOICELY_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "invoicely.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "invoicely-logs";

/// Values supplied explicitly by the caller (for example CLI flags).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

impl AppConfig {
    /// Resolves configuration against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, String> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves configuration against an arbitrary variable lookup.
    ///
    /// # Errors
    /// - Returns an error for an unsupported log level.
    /// - Returns an error when a relative log directory cannot be made absolute.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let from_env = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = overrides
            .db_path
            .or_else(|| from_env(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_dir = overrides
            .log_dir
            .or_else(|| from_env(LOG_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            std::env::current_dir()
                .map_err(|err| format!("cannot resolve relative log_dir: {err}"))?
                .join(log_dir)
        };

        let log_level = match overrides.log_level.or_else(|| from_env(LOG_LEVEL_ENV)) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigOverrides, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_live_in_temp_dir() {
        let config = AppConfig::resolve_with(ConfigOverrides::default(), lookup(&[])).unwrap();
        assert_eq!(config.db_path, std::env::temp_dir().join("invoicely.sqlite3"));
        assert_eq!(config.log_dir, std::env::temp_dir().join("invoicely-logs"));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn environment_applies_and_blank_values_are_ignored() {
        let config = AppConfig::resolve_with(
            ConfigOverrides::default(),
            lookup(&[
                (DB_PATH_ENV, "/data/inv.db"),
                (LOG_DIR_ENV, "   "),
                (LOG_LEVEL_ENV, "WARNING"),
            ]),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/inv.db"));
        assert_eq!(config.log_dir, std::env::temp_dir().join("invoicely-logs"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn overrides_win_over_environment() {
        let overrides = ConfigOverrides {
            db_path: Some(PathBuf::from("/override.db")),
            log_dir: Some(PathBuf::from("/var/log/invoicely")),
            log_level: Some("trace".to_string()),
        };
        let config = AppConfig::resolve_with(
            overrides,
            lookup(&[(DB_PATH_ENV, "/env.db"), (LOG_LEVEL_ENV, "error")]),
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/override.db"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/invoicely"));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn relative_log_dir_is_made_absolute_and_bad_level_rejected() {
        let overrides = ConfigOverrides {
            log_dir: Some(PathBuf::from("logs")),
            ..ConfigOverrides::default()
        };
        let config = AppConfig::resolve_with(overrides, lookup(&[])).unwrap();
        assert!(config.log_dir.is_absolute());
        assert!(config.log_dir.ends_with("logs"));

        let err = AppConfig::resolve_with(
            ConfigOverrides::default(),
            lookup(&[(LOG_LEVEL_ENV, "loud")]),
        )
        .unwrap_err();
        assert!(err.contains("unsupported log level"));
    }
}
