//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export CATALOG_PATH="data/catalog.json"
//! export LISTEN="0.0.0.0:3000"
//! export FETCH_RETRY_ATTEMPTS=3
//! export FETCH_TIMEOUT_MS=5000
//! ```
//!
//! ## Optional Variables
//!
//! - `CATALOG_PATH` - JSON catalog served by the gateway (default: `data/catalog.json`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `FETCH_RETRY_ATTEMPTS` - Attempts per gateway call, 1 to 10 (default: 3)
//! - `FETCH_RETRY_BASE_MS` - Delay before the first retry (default: 100)
//! - `FETCH_TIMEOUT_MS` - Limit per attempt, `0` disables it (default: 5000)
//! - `DEFAULT_PATH_ENABLED` - Open the default path after loading (default: `true`)

use crate::infrastructure::gateway::RetryPolicy;
use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub fetch_retry_attempts: usize,
    pub fetch_retry_base_ms: u64,
    /// Per-attempt limit in milliseconds; `0` means no limit.
    pub fetch_timeout_ms: u64,
    pub default_path_enabled: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so required variables can be added
    /// without changing callers.
    pub fn from_env() -> Result<Self> {
        let catalog_path = env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/catalog.json"));
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let fetch_retry_attempts = parse_var("FETCH_RETRY_ATTEMPTS").unwrap_or(3);
        let fetch_retry_base_ms = parse_var("FETCH_RETRY_BASE_MS").unwrap_or(100);
        let fetch_timeout_ms = parse_var("FETCH_TIMEOUT_MS").unwrap_or(5_000);

        let default_path_enabled = env::var("DEFAULT_PATH_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(true);

        Ok(Self {
            catalog_path,
            listen_addr,
            log_level,
            log_format,
            fetch_retry_attempts,
            fetch_retry_base_ms,
            fetch_timeout_ms,
            default_path_enabled,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `fetch_retry_attempts` is not between 1 and 10
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `catalog_path` is empty
    pub fn validate(&self) -> Result<()> {
        if self.fetch_retry_attempts == 0 || self.fetch_retry_attempts > 10 {
            anyhow::bail!(
                "FETCH_RETRY_ATTEMPTS must be between 1 and 10, got {}",
                self.fetch_retry_attempts
            );
        }

        if self.fetch_retry_base_ms > 60_000 {
            anyhow::bail!(
                "FETCH_RETRY_BASE_MS is too large (max: 60000), got {}",
                self.fetch_retry_base_ms
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.catalog_path.as_os_str().is_empty() {
            anyhow::bail!("CATALOG_PATH must not be empty");
        }

        Ok(())
    }

    /// Retry policy for the catalog gateway.
    pub fn retry_policy(&self) -> RetryPolicy {
        let base_delay = Duration::from_millis(self.fetch_retry_base_ms);
        RetryPolicy {
            attempts: self.fetch_retry_attempts,
            base_delay,
            max_delay: RetryPolicy::default().max_delay.max(base_delay),
            timeout: (self.fetch_timeout_ms > 0)
                .then(|| Duration::from_millis(self.fetch_timeout_ms)),
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Catalog: {}", self.catalog_path.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!(
            "  Fetch retries: {} attempts, {}ms base delay",
            self.fetch_retry_attempts,
            self.fetch_retry_base_ms
        );
        if self.fetch_timeout_ms > 0 {
            tracing::info!("  Fetch timeout: {}ms", self.fetch_timeout_ms);
        } else {
            tracing::info!("  Fetch timeout: disabled");
        }
        tracing::info!("  Default path: {}", self.default_path_enabled);
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
