use serde::{Deserialize, Serialize};

/// Main configuration structure for the analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Worker pool and run deadline settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Metrics backend client settings
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Evaluation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Maximum number of concurrent workers per run (1-100)
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Fixed deadline for collecting all values of one run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Namespace used for references that do not name one
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

const fn default_max_workers() -> usize {
    4
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            timeout_secs: default_timeout_secs(),
            namespace: default_namespace(),
        }
    }
}

/// Metrics backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendsConfig {
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    20
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
