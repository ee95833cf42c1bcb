//! Calculator configuration
//!
//! Defaults match the interactive calculator. Each value can be overridden
//! through an environment variable; unparsable values keep the default.

use std::env;
use thiserror::Error;

/// Environment variable overriding [`CalculatorConfig::cache_capacity`]
pub const ENV_CACHE_CAPACITY: &str = "SUBNETCALC_CACHE_CAPACITY";
/// Environment variable overriding [`CalculatorConfig::default_max_ranges`]
pub const ENV_MAX_RANGES: &str = "SUBNETCALC_MAX_RANGES";
/// Environment variable overriding [`CalculatorConfig::history_capacity`]
pub const ENV_HISTORY_CAPACITY: &str = "SUBNETCALC_HISTORY_CAPACITY";

pub const DEFAULT_CACHE_CAPACITY: usize = 50;
pub const DEFAULT_MAX_RANGES: u64 = 50;
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A capacity of zero was requested
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tunables for the calculator service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    /// Maximum number of cached calculation results
    pub cache_capacity: usize,
    /// Range cap used when a caller does not give one
    pub default_max_ranges: u64,
    /// Maximum number of history entries kept
    pub history_capacity: usize,
}

impl CalculatorConfig {
    /// Defaults overridden by whatever is set in the environment
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            cache_capacity: read_var(ENV_CACHE_CAPACITY).unwrap_or(defaults.cache_capacity),
            default_max_ranges: read_var(ENV_MAX_RANGES).unwrap_or(defaults.default_max_ranges),
            history_capacity: read_var(ENV_HISTORY_CAPACITY)
                .unwrap_or(defaults.history_capacity),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject capacities the stores cannot be built with
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("cache capacity"));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("history capacity"));
        }
        Ok(())
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            default_max_ranges: DEFAULT_MAX_RANGES,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn read_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok()?.trim().parse().ok()
}
