//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReframeError, ReframeResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Trace replay defaults.
    #[serde(default)]
    pub replay: ReplayDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied when replaying traces through a solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayDefaults {
    /// Interval between prediction ticks inserted between observations
    /// (microseconds). Zero disables ticking.
    pub tick_interval_us: u64,

    /// Solver options file used when none is given on the command line.
    pub default_options_path: Option<PathBuf>,

    /// Keep replaying after a record is rejected by the solver.
    pub skip_rejected: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "reframe_path_solver=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for ReplayDefaults {
    fn default() -> Self {
        Self {
            // ~30 fps render loop
            tick_interval_us: 33_333,
            default_options_path: None,
            skip_rejected: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match Self::from_json(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Parse config from a JSON string. Missing sections take defaults.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Write config as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ReframeResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ReframeError::from_io_at(e, parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, format!("{json}\n")).map_err(|e| ReframeError::from_io_at(e, path))
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("reframe").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config =
            AppConfig::from_json(r#"{"logging": {"level": "debug", "json": true, "file": null}}"#)
                .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.replay.tick_interval_us, 33_333);
        assert!(!config.replay.skip_rejected);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = AppConfig::default();
        config.replay.tick_interval_us = 16_666;
        config.replay.default_options_path = Some(PathBuf::from("pan.json"));

        let json = serde_json::to_string(&config).unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert_eq!(parsed.replay.tick_interval_us, 16_666);
        assert_eq!(parsed.replay.default_options_path, Some(PathBuf::from("pan.json")));
    }

    #[test]
    fn test_save_to_writes_loadable_config() {
        let dir = std::env::temp_dir().join("reframe_test_config_save");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.logging.level = "reframe_path_solver=trace".to_string();
        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded = AppConfig::from_json(&content).unwrap();
        assert_eq!(loaded.logging.level, "reframe_path_solver=trace");
        assert_eq!(loaded.replay.tick_interval_us, 33_333);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
