//! Registry Configuration
//!
//! Deployment-time knobs for the registration core: where the roster file
//! lives, which webhook receives replicated rows, the admin secret digest,
//! and the replication retry schedule. `from_env` applies the usual
//! environment overrides on top of the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Bounded-retry schedule for the replication client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delivery attempts per row.
    pub max_attempts: u32,
    /// Backoff base; after failed attempt `n` (1-based) the client waits
    /// `n * base_delay_ms` before the next try.
    pub base_delay_ms: u64,
    /// Per-attempt request timeout.
    pub request_timeout_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            request_timeout_secs: 10,
        }
    }
}

impl RetryPolicy {
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms * u64::from(attempt))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Complete configuration for the registration core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Durable roster file (CSV).
    pub data_file: PathBuf,
    /// Spreadsheet webhook that mirrors accepted rows. Empty disables
    /// replication.
    pub sheet_endpoint: String,
    /// Hex SHA-256 digest of the admin secret.
    pub admin_digest: String,
    /// Replication retry schedule.
    pub retry: RetryPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("athletes_data.csv"),
            sheet_endpoint: String::new(),
            admin_digest: crate::auth::hash_password("change-me"),
            retry: RetryPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Defaults overridden by `ROSTER_DATA_FILE`, `ROSTER_SHEET_ENDPOINT`,
    /// and `ROSTER_ADMIN_DIGEST`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("ROSTER_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("ROSTER_SHEET_ENDPOINT") {
            config.sheet_endpoint = url;
        }
        if let Ok(digest) = std::env::var("ROSTER_ADMIN_DIGEST") {
            config.admin_digest = digest;
        }
        config
    }
}
