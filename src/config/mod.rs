//! Configuration handling for the pipeline.
//!
//! Everything is read from environment variables with development defaults,
//! so a bare `Config::from_env()` always produces something usable. The
//! setters exist for tests and embedders that want to tighten timeouts or
//! concurrency caps directly.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names. Keeping them public lets tests and embedding
/// code refer to them directly.
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "SKIMMER_CONNECT_TIMEOUT_SECS";
pub const ENV_READ_TIMEOUT_SECS: &str = "SKIMMER_READ_TIMEOUT_SECS";
pub const ENV_TOTAL_TIMEOUT_SECS: &str = "SKIMMER_TOTAL_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "SKIMMER_PROXY_URL";
pub const ENV_MAX_CONCURRENCY: &str = "SKIMMER_MAX_CONCURRENCY";
pub const ENV_PER_HOST_CONCURRENCY: &str = "SKIMMER_PER_HOST_CONCURRENCY";
pub const ENV_BLOB_BASE_URL: &str = "SKIMMER_BLOB_BASE_URL";

/// Default values used when environment variables are absent.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOTAL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENCY: usize = 5;
const DEFAULT_PER_HOST_CONCURRENCY: usize = 2;
const DEFAULT_BLOB_BASE_URL: &str = "https://blobs.example.com";

/// Image probes run on a much tighter budget than page fetches and are
/// bounded separately from the top-level URL concurrency cap.
const DEFAULT_PROBE_CONNECT_TIMEOUT_SECS: u64 = 2;
const DEFAULT_PROBE_TOTAL_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PROBE_CONCURRENCY: usize = 4;

/// Runtime configuration for a batch pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    connect_timeout: Duration,
    read_timeout: Duration,
    total_timeout: Duration,
    proxy_url: Option<String>,
    max_concurrency: usize,
    per_host_concurrency: usize,
    probe_connect_timeout: Duration,
    probe_total_timeout: Duration,
    probe_concurrency: usize,
    blob_base_url: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(secs) = read_u64(ENV_CONNECT_TIMEOUT_SECS)? {
            cfg.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = read_u64(ENV_READ_TIMEOUT_SECS)? {
            cfg.read_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = read_u64(ENV_TOTAL_TIMEOUT_SECS)? {
            cfg.total_timeout = Duration::from_secs(secs);
        }
        if let Ok(proxy) = env::var(ENV_PROXY_URL)
            && !proxy.is_empty()
        {
            cfg.proxy_url = Some(proxy);
        }
        if let Some(n) = read_u64(ENV_MAX_CONCURRENCY)? {
            cfg.set_max_concurrency(n as usize)?;
        }
        if let Some(n) = read_u64(ENV_PER_HOST_CONCURRENCY)? {
            cfg.set_per_host_concurrency(n as usize)?;
        }
        if let Ok(base) = env::var(ENV_BLOB_BASE_URL)
            && !base.is_empty()
        {
            cfg.blob_base_url = base;
        }
        Ok(cfg)
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
    pub fn total_timeout(&self) -> Duration {
        self.total_timeout
    }
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
    pub fn per_host_concurrency(&self) -> usize {
        self.per_host_concurrency
    }
    pub fn probe_connect_timeout(&self) -> Duration {
        self.probe_connect_timeout
    }
    pub fn probe_total_timeout(&self) -> Duration {
        self.probe_total_timeout
    }
    pub fn probe_concurrency(&self) -> usize {
        self.probe_concurrency
    }
    /// Base URL prepended to stored-document object keys.
    pub fn blob_base_url(&self) -> &str {
        &self.blob_base_url
    }

    pub fn set_connect_timeout(&mut self, d: Duration) {
        self.connect_timeout = d;
    }
    pub fn set_read_timeout(&mut self, d: Duration) {
        self.read_timeout = d;
    }
    pub fn set_total_timeout(&mut self, d: Duration) {
        self.total_timeout = d;
    }
    pub fn set_proxy_url(&mut self, proxy: Option<String>) {
        self.proxy_url = proxy;
    }
    pub fn set_probe_connect_timeout(&mut self, d: Duration) {
        self.probe_connect_timeout = d;
    }
    pub fn set_probe_total_timeout(&mut self, d: Duration) {
        self.probe_total_timeout = d;
    }

    pub fn set_max_concurrency(&mut self, n: usize) -> Result<(), ConfigError> {
        if n < 1 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }
        self.max_concurrency = n;
        Ok(())
    }

    pub fn set_per_host_concurrency(&mut self, n: usize) -> Result<(), ConfigError> {
        if n < 1 {
            return Err(ConfigError::InvalidValue {
                field: ENV_PER_HOST_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }
        self.per_host_concurrency = n;
        Ok(())
    }

    pub fn set_blob_base_url(&mut self, base: impl Into<String>) {
        self.blob_base_url = base.into();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            total_timeout: Duration::from_secs(DEFAULT_TOTAL_TIMEOUT_SECS),
            proxy_url: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            per_host_concurrency: DEFAULT_PER_HOST_CONCURRENCY,
            probe_connect_timeout: Duration::from_secs(DEFAULT_PROBE_CONNECT_TIMEOUT_SECS),
            probe_total_timeout: Duration::from_secs(DEFAULT_PROBE_TOTAL_TIMEOUT_SECS),
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            blob_base_url: DEFAULT_BLOB_BASE_URL.to_string(),
        }
    }
}

fn read_u64(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
