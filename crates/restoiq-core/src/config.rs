//! Pipeline configuration: JSON file with environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::envelope::DEFAULT_ENVELOPE_VERSION;
use crate::error::Error;

/// Default query length cap, in characters.
pub const DEFAULT_MAX_QUERY_LEN: usize = 10_000;

/// Benchmark targets handlers fall back to when the query gives none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultTargets {
    #[serde(default = "default_labor_target")]
    pub target_labor_percent: f64,
    #[serde(default = "default_food_target")]
    pub target_food_percent: f64,
    #[serde(default = "default_prime_target")]
    pub target_prime_percent: f64,
}

fn default_labor_target() -> f64 {
    30.0
}
fn default_food_target() -> f64 {
    30.0
}
fn default_prime_target() -> f64 {
    60.0
}

impl Default for DefaultTargets {
    fn default() -> Self {
        Self {
            target_labor_percent: default_labor_target(),
            target_food_percent: default_food_target(),
            target_prime_percent: default_prime_target(),
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Version string stamped into every envelope's `meta`.
    #[serde(default = "default_version")]
    pub envelope_version: String,
    /// Lock the task registry once startup registration completes.
    #[serde(default = "default_lock")]
    pub lock_registry_after_startup: bool,
    /// Queries longer than this are truncated before extraction.
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
    #[serde(default)]
    pub default_targets: DefaultTargets,
}

fn default_version() -> String {
    DEFAULT_ENVELOPE_VERSION.into()
}
fn default_lock() -> bool {
    true
}
fn default_max_query_len() -> usize {
    DEFAULT_MAX_QUERY_LEN
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            envelope_version: default_version(),
            lock_registry_after_startup: default_lock(),
            max_query_len: default_max_query_len(),
            default_targets: DefaultTargets::default(),
        }
    }
}

impl PipelineConfig {
    /// Load config from file, falling back to defaults, then apply env overrides.
    pub fn load(config_path: &Path) -> Self {
        let mut config: PipelineConfig = match std::fs::read_to_string(config_path) {
            Ok(s) => match serde_json::from_str::<PipelineConfig>(&s) {
                Ok(c) => match c.validate() {
                    Ok(()) => {
                        info!("Loaded pipeline config from {}", config_path.display());
                        c
                    }
                    Err(e) => {
                        warn!("Ignoring config {}: {}", config_path.display(), e);
                        PipelineConfig::default()
                    }
                },
                Err(e) => {
                    warn!("Ignoring invalid config {}: {}", config_path.display(), e);
                    PipelineConfig::default()
                }
            },
            Err(_) => PipelineConfig::default(),
        };
        config.apply_env();
        config
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        let mut config = PipelineConfig::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("RESTOIQ_ENVELOPE_VERSION") {
            if !v.trim().is_empty() {
                self.envelope_version = v.trim().to_string();
            }
        }
        if let Some(lock) = std::env::var("RESTOIQ_LOCK_REGISTRY")
            .ok()
            .and_then(|v| parse_bool(&v))
        {
            self.lock_registry_after_startup = lock;
        }
        if let Some(len) = std::env::var("RESTOIQ_MAX_QUERY_LEN")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
        {
            self.max_query_len = len;
        }
    }

    /// Reject settings no pipeline can run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.envelope_version.trim().is_empty() {
            return Err(Error::Config("envelope_version must not be empty".into()));
        }
        if self.max_query_len == 0 {
            return Err(Error::Config("max_query_len must be greater than 0".into()));
        }
        let targets = &self.default_targets;
        for (name, value) in [
            ("target_labor_percent", targets.target_labor_percent),
            ("target_food_percent", targets.target_food_percent),
            ("target_prime_percent", targets.target_prime_percent),
        ] {
            if !(value > 0.0 && value < 100.0) {
                return Err(Error::Config(format!("{} must be between 0 and 100", name)));
            }
        }
        Ok(())
    }

    /// Save config to disk as pretty JSON.
    pub fn save(&self, config_path: &Path) -> crate::Result<()> {
        self.validate()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        info!("Saved pipeline config to {}", config_path.display());
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.envelope_version, "1.0.0");
        assert!(config.lock_registry_after_startup);
        assert_eq!(config.max_query_len, DEFAULT_MAX_QUERY_LEN);
        assert_eq!(config.default_targets.target_prime_percent, 60.0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("restoiq.json");
        let mut config = PipelineConfig::default();
        config.max_query_len = 512;
        config.default_targets.target_labor_percent = 28.0;
        config.save(&path).unwrap();

        let loaded = PipelineConfig::load(&path);
        assert_eq!(loaded.max_query_len, 512);
        assert_eq!(loaded.default_targets.target_labor_percent, 28.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restoiq.json");
        std::fs::write(&path, r#"{"default_targets": {"target_food_percent": 32.0}}"#).unwrap();
        let loaded = PipelineConfig::load(&path);
        assert_eq!(loaded.default_targets.target_food_percent, 32.0);
        assert_eq!(loaded.default_targets.target_labor_percent, 30.0);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restoiq.json");
        std::fs::write(&path, "not json").unwrap();
        let loaded = PipelineConfig::load(&path);
        assert_eq!(loaded.max_query_len, DEFAULT_MAX_QUERY_LEN);
    }

    #[test]
    fn test_validate_rejects_bad_targets() {
        let mut config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        config.default_targets.target_prime_percent = 140.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restoiq.json");
        assert!(config.save(&path).is_err());
        std::fs::write(&path, r#"{"max_query_len": 0}"#).unwrap();
        assert_eq!(PipelineConfig::load(&path).max_query_len, DEFAULT_MAX_QUERY_LEN);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
