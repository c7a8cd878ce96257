//! Configuration management for flatns
//!
//! Built-in defaults are layered under an optional `config.toml` and `FLATNS_*`
//! environment overrides, e.g. `FLATNS_MAX_LIST_KEYS=500`.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_STORE_ROOT: &str = "./store_root";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_LIST_KEYS: i64 = 1000;
const DEFAULT_MAX_UPLOAD_SIZE_MB: i64 = 64;
const DEFAULT_DELETE_RETRIES: i64 = 3;
const DEFAULT_RETRY_BACKOFF_MS: i64 = 100;
const DEFAULT_MAX_DISPLAY_NAME_LENGTH: i64 = 255;

/// 1 TiB
const MAX_UPLOAD_SIZE_MB: u64 = 1024 * 1024;
const MAX_RETRY_BACKOFF_MS: u64 = 60_000;
const MAX_DELETE_RETRIES: usize = 100;

/// Complete namespace configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NamespaceConfig {
    #[serde(flatten)]
    pub store: StoreConfig,

    #[serde(flatten)]
    pub limits: LimitsConfig,
}

/// Backend location and process-wide settings
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Root directory of the local object store
    pub store_root: String,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

/// Limits applied by namespace operations
#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Page size of prefix scans
    pub max_list_keys: usize,

    pub max_upload_size_mb: u64,

    /// Extra attempts for a key delete that failed transiently
    pub delete_retries: usize,

    /// Backoff unit between delete attempts; attempt `n` waits `n` units
    pub retry_backoff_ms: u64,

    pub max_display_name_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_root: DEFAULT_STORE_ROOT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_list_keys: DEFAULT_MAX_LIST_KEYS as usize,
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB as u64,
            delete_retries: DEFAULT_DELETE_RETRIES as usize,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS as u64,
            max_display_name_length: DEFAULT_MAX_DISPLAY_NAME_LENGTH as usize,
        }
    }
}

impl NamespaceConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Packaged layout first, then the working directory
        Self::load_from(&["flatns/config", "config"])
    }

    /// Load configuration from the given files (all optional) with environment
    /// overrides. Later files win over earlier ones.
    pub fn load_from(paths: &[&str]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("store_root", DEFAULT_STORE_ROOT)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("max_list_keys", DEFAULT_MAX_LIST_KEYS)?
            .set_default("max_upload_size_mb", DEFAULT_MAX_UPLOAD_SIZE_MB)?
            .set_default("delete_retries", DEFAULT_DELETE_RETRIES)?
            .set_default("retry_backoff_ms", DEFAULT_RETRY_BACKOFF_MS)?
            .set_default("max_display_name_length", DEFAULT_MAX_DISPLAY_NAME_LENGTH)?;

        for path in paths {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("FLATNS").try_parsing(true))
            .build()?;

        let config: NamespaceConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.store_root.is_empty() {
            return Err(ConfigError::Message("store_root cannot be empty".into()));
        }

        if self.limits.max_list_keys == 0 {
            return Err(ConfigError::Message(
                "max_list_keys must be greater than 0".into(),
            ));
        }

        if self.limits.max_upload_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        if self.limits.max_upload_size_mb > MAX_UPLOAD_SIZE_MB {
            return Err(ConfigError::Message(format!(
                "max_upload_size_mb cannot exceed {}",
                MAX_UPLOAD_SIZE_MB
            )));
        }

        if self.limits.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(ConfigError::Message(format!(
                "retry_backoff_ms cannot exceed {}",
                MAX_RETRY_BACKOFF_MS
            )));
        }

        if self.limits.delete_retries > MAX_DELETE_RETRIES {
            return Err(ConfigError::Message(format!(
                "delete_retries cannot exceed {}",
                MAX_DELETE_RETRIES
            )));
        }

        if self.limits.max_display_name_length == 0 {
            return Err(ConfigError::Message(
                "max_display_name_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StoreConfig {
    pub fn store_root_path(&self) -> PathBuf {
        PathBuf::from(&self.store_root)
    }
}

impl LimitsConfig {
    /// Get maximum upload size in bytes
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    /// Wait before delete attempt number `attempt` (1-based)
    pub fn retry_backoff(&self, attempt: usize) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(attempt as u64))
    }
}
