use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_workers: {0}. Must be between 1 and 100")]
    InvalidMaxWorkers(usize),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid request_timeout_secs: {0}. Must be at least 1")]
    InvalidRequestTimeout(u64),

    #[error("Default namespace cannot be empty")]
    EmptyNamespace,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. slo-analyzer.yaml in the working directory
    /// 3. slo-analyzer.local.yaml (local overrides, optional)
    /// 4. Environment variables (SLO_ANALYZER_* prefix, `__` separates levels)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("slo-analyzer.yaml"))
            .merge(Yaml::file("slo-analyzer.local.yaml"))
            .merge(Env::prefixed("SLO_ANALYZER_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let engine = &config.engine;
        if engine.max_workers == 0 || engine.max_workers > 100 {
            return Err(ConfigError::InvalidMaxWorkers(engine.max_workers));
        }

        if engine.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(engine.timeout_secs));
        }

        if engine.namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }

        if config.backends.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout(
                config.backends.request_timeout_secs,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.max_workers, 4);
        assert_eq!(config.engine.timeout_secs, 10);
        assert_eq!(config.engine.namespace, "default");
        assert_eq!(config.backends.request_timeout_secs, 20);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
engine:
  max_workers: 8
  timeout_secs: 30
  namespace: keptn
backends:
  request_timeout_secs: 5
logging:
  level: debug
  format: pretty
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.engine.max_workers, 8);
        assert_eq!(config.engine.timeout_secs, 30);
        assert_eq!(config.engine.namespace, "keptn");
        assert_eq!(config.backends.request_timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("engine:\n  max_workers: 2\n").unwrap();
        assert_eq!(config.engine.max_workers, 2);
        assert_eq!(config.engine.timeout_secs, 10);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_validate_zero_workers() {
        let mut config = Config::default();
        config.engine.max_workers = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxWorkers(0)
        ));
    }

    #[test]
    fn test_validate_too_many_workers() {
        let mut config = Config::default();
        config.engine.max_workers = 101;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxWorkers(101)
        ));
    }

    #[test]
    fn test_validate_zero_timeouts() {
        let mut config = Config::default();
        config.engine.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTimeout(0)
        ));

        let mut config = Config::default();
        config.backends.request_timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidRequestTimeout(0)
        ));
    }

    #[test]
    fn test_validate_empty_namespace() {
        let mut config = Config::default();
        config.engine.namespace = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyNamespace
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_override() {
        temp_env::with_vars(
            [
                ("SLO_ANALYZER_ENGINE__MAX_WORKERS", Some("25")),
                ("SLO_ANALYZER_ENGINE__NAMESPACE", Some("prod")),
                ("SLO_ANALYZER_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load().expect("config should load");
                assert_eq!(config.engine.max_workers, 25);
                assert_eq!(config.engine.namespace, "prod");
                assert_eq!(config.logging.level, "debug");
                assert_eq!(config.engine.timeout_secs, 10);
            },
        );
    }

    #[test]
    fn test_env_override_is_validated() {
        temp_env::with_var("SLO_ANALYZER_ENGINE__MAX_WORKERS", Some("0"), || {
            assert!(ConfigLoader::load().is_err());
        });
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  timeout_secs: 3\nlogging:\n  format: pretty").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.engine.timeout_secs, 3);
        assert_eq!(config.engine.max_workers, 4);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "engine:\n  max_workers: 5\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "engine:\n  max_workers: 15\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.engine.max_workers, 15, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
