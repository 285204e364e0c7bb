use std::env;

use crate::error::RouterError;

/// Orchestrator configuration loaded from environment variables.
///
/// `Config::from_env()` panics with a clear message if a required var is
/// missing; `Config::validate()` catches values that parsed fine but are
/// nonsensical (zero batch size, zero poll interval) before the
/// orchestrator starts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string for the history/cursor store.
    pub database_url: String,
    /// Base URL of the document store (search/index backend).
    pub document_store_url: String,
    /// Base URL of the pub/sub bus.
    pub bus_url: String,

    /// Main cycle interval (fetch + route + publish). Default 30s.
    pub poll_interval_secs: u64,
    /// How often (in seconds) to re-run index discovery. Default 300s (5 min).
    pub discovery_interval_secs: u64,
    /// How often (in seconds) to refresh the custom-channel registry. Default 60s.
    pub registry_refresh_interval_secs: u64,
    /// Max articles fetched per source per cycle. Default 100.
    pub batch_size: i64,
    /// Upper bound on cross-source concurrency. 0 means
    /// `min(active_sources, 8)` is computed at runtime.
    pub max_source_concurrency: usize,
    /// Per-adapter-call timeout. Default 30s.
    pub adapter_timeout_secs: u64,
    /// How long to let in-flight batches finish during graceful shutdown. Default 30s.
    pub shutdown_drain_secs: u64,
    /// "json" or "text". Default "text".
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            document_store_url: required_env("DOCUMENT_STORE_URL"),
            bus_url: required_env("BUS_URL"),
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS", 30),
            discovery_interval_secs: env_parse("DISCOVERY_INTERVAL_SECS", 300),
            registry_refresh_interval_secs: env_parse("REGISTRY_REFRESH_INTERVAL_SECS", 60),
            batch_size: env_parse("BATCH_SIZE", 100),
            max_source_concurrency: env_parse("MAX_SOURCE_CONCURRENCY", 0),
            adapter_timeout_secs: env_parse("ADAPTER_TIMEOUT_SECS", 30),
            shutdown_drain_secs: env_parse("SHUTDOWN_DRAIN_SECS", 30),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        }
    }

    /// Reject configuration that parsed but makes no operational sense.
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.poll_interval_secs == 0 {
            return Err(RouterError::Fatal(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if self.batch_size <= 0 {
            return Err(RouterError::Fatal(
                "BATCH_SIZE must be greater than zero".to_string(),
            ));
        }
        if self.discovery_interval_secs < self.poll_interval_secs {
            return Err(RouterError::Fatal(
                "DISCOVERY_INTERVAL_SECS must be >= POLL_INTERVAL_SECS".to_string(),
            ));
        }
        if self.registry_refresh_interval_secs < self.poll_interval_secs {
            return Err(RouterError::Fatal(
                "REGISTRY_REFRESH_INTERVAL_SECS must be >= POLL_INTERVAL_SECS".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of poll cycles between discovery refreshes, rounded up.
    pub fn discovery_interval_cycles(&self) -> u64 {
        self.discovery_interval_secs.div_ceil(self.poll_interval_secs).max(1)
    }

    /// Number of poll cycles between channel-registry refreshes, rounded up.
    pub fn registry_refresh_interval_cycles(&self) -> u64 {
        self.registry_refresh_interval_secs
            .div_ceil(self.poll_interval_secs)
            .max(1)
    }

    /// Log non-sensitive shape of the config (lengths, not values, for URLs
    /// that embed credentials).
    pub fn log_redacted(&self) {
        tracing::info!(
            poll_interval_secs = self.poll_interval_secs,
            discovery_interval_secs = self.discovery_interval_secs,
            registry_refresh_interval_secs = self.registry_refresh_interval_secs,
            batch_size = self.batch_size,
            max_source_concurrency = self.max_source_concurrency,
            adapter_timeout_secs = self.adapter_timeout_secs,
            shutdown_drain_secs = self.shutdown_drain_secs,
            database_url_len = self.database_url.len(),
            document_store_url_len = self.document_store_url.len(),
            bus_url_len = self.bus_url.len(),
            "loaded configuration",
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
