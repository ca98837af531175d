//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_LRU_CAPACITY: usize = 1000;
const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Values are not validated here; constructors reject invalid ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries held by an LRU cache
    pub lru_capacity: usize,
    /// Period between background TTL sweeps
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CAPACITY` - LRU cache capacity (default: 1000)
    /// - `TTL_SWEEP_INTERVAL_MS` - Sweep period in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            lru_capacity: env::var("LRU_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LRU_CAPACITY),
            sweep_interval: Duration::from_millis(
                env::var("TTL_SWEEP_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SWEEP_INTERVAL_MS),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lru_capacity: DEFAULT_LRU_CAPACITY,
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
        }
    }
}
