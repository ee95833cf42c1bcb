//! Subnet arithmetic engine
//!
//! Computes network/broadcast addresses, host ranges, masks and subnet
//! listings from an address and prefix:
//! - [`compute_subnet_info`] - full [`SubnetInfo`] for one request
//! - [`enumerate_subnet_ranges`] - capped listing of sibling subnets
//! - [`SubnetCalculator`] - the same operations behind a FIFO result cache
//! - [`resolve_prefix`] - prefix from a desired subnet or host count
//!
//! # Examples
//!
//! ```
//! use subnet_calc::SubnetCalculator;
//!
//! let mut calc = SubnetCalculator::new()?;
//! let info = calc.calculate("10.0.0.0", 16, true, 100)?;
//! assert_eq!(info.broadcast_address, "10.0.255.255");
//! assert_eq!(info.number_of_subnets, 256);
//!
//! // Same request again is served from the cache
//! let again = calc.calculate("10.0.0.0", 16, true, 100)?;
//! assert!(std::sync::Arc::ptr_eq(&info, &again));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;
use subnet_cache::{CacheKey, CacheStats, CalculationCache};
use subnet_core::config::CalculatorConfig;
use subnet_core::{IpClass, Result, SubnetInfo, SubnetRange};
use tracing::{debug, info};

mod calculate;
mod derive;
mod enumerate;

pub use calculate::compute_subnet_info;
pub use derive::{prefix_from_host_count, prefix_from_subnet_count, resolve_prefix, PrefixSource};
pub use enumerate::{enumerate_from, enumerate_subnet_ranges, SubnetLayout};

/// Subnet calculator with a bounded result cache
///
/// Owns its cache; build one per thread or wrap it in a `Mutex` to share.
pub struct SubnetCalculator {
    cache: CalculationCache,
    config: CalculatorConfig,
}

impl SubnetCalculator {
    /// Calculator with default configuration
    pub fn new() -> subnet_cache::Result<Self> {
        Self::with_config(CalculatorConfig::default())
    }

    /// Calculator with custom configuration
    pub fn with_config(config: CalculatorConfig) -> subnet_cache::Result<Self> {
        Ok(Self {
            cache: CalculationCache::new(config.cache_capacity)?,
            config,
        })
    }

    /// Compute or fetch a cached [`SubnetInfo`]
    ///
    /// A hit returns the stored value as is; a miss validates, computes and
    /// stores. Failed calculations are not cached.
    pub fn calculate(
        &mut self,
        address: &str,
        prefix: u8,
        include_ranges: bool,
        max_ranges: u64,
    ) -> Result<Arc<SubnetInfo>> {
        let key = CacheKey::new(address, prefix, include_ranges, max_ranges);
        if let Some(info) = self.cache.get(&key) {
            return Ok(info);
        }

        debug!(key = %key, "computing subnet info");
        let info = Arc::new(compute_subnet_info(address, prefix, include_ranges, max_ranges)?);
        self.cache.insert(key, Arc::clone(&info));
        Ok(info)
    }

    /// [`SubnetCalculator::calculate`] with the configured range cap
    pub fn calculate_default(
        &mut self,
        address: &str,
        prefix: u8,
        include_ranges: bool,
    ) -> Result<Arc<SubnetInfo>> {
        self.calculate(address, prefix, include_ranges, self.config.default_max_ranges)
    }

    /// Resolve the prefix from `source` and calculate
    pub fn calculate_from(
        &mut self,
        address: &str,
        source: PrefixSource,
        include_ranges: bool,
        max_ranges: u64,
    ) -> Result<Arc<SubnetInfo>> {
        let prefix = resolve_prefix(address, source)?;
        self.calculate(address, prefix, include_ranges, max_ranges)
    }

    /// Enumerate subnet ranges, uncached
    pub fn enumerate(&self, address: &str, prefix: u8, max_ranges: u64) -> Result<Vec<SubnetRange>> {
        enumerate_subnet_ranges(address, prefix, max_ranges)
    }

    /// Classful address class of `address`
    pub fn classify(&self, address: &str) -> Result<IpClass> {
        subnet_cidr::classify_address(address)
    }

    /// Drop every cached result
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        info!("calculation cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subnet_core::SubnetError;

    #[test]
    fn test_cache_hit_does_not_recompute() {
        let mut calc = SubnetCalculator::new().unwrap();
        let first = calc.calculate("10.0.0.0", 16, false, 0).unwrap();
        let second = calc.calculate("10.0.0.0", 16, false, 0).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = calc.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_range_cap_is_part_of_key() {
        let mut calc = SubnetCalculator::new().unwrap();
        let a = calc.calculate("10.0.0.0", 24, true, 5).unwrap();
        let b = calc.calculate("10.0.0.0", 24, true, 10).unwrap();

        assert_eq!(a.subnet_ranges.ranges().map(|r| r.len()), Some(5));
        assert_eq!(b.subnet_ranges.ranges().map(|r| r.len()), Some(10));
        assert_eq!(calc.cache_stats().size, 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut calc = SubnetCalculator::new().unwrap();
        assert!(matches!(
            calc.calculate("10.0.0.256", 24, false, 0),
            Err(SubnetError::InvalidAddress(_))
        ));
        assert_eq!(calc.cache_stats().size, 0);
    }

    #[test]
    fn test_clear_cache() {
        let mut calc = SubnetCalculator::new().unwrap();
        let first = calc.calculate("192.168.1.0", 24, false, 0).unwrap();
        calc.clear_cache();
        let second = calc.calculate("192.168.1.0", 24, false, 0).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_eviction_after_capacity() {
        let mut calc = SubnetCalculator::new().unwrap();
        let first = calc.calculate("10.0.0.0", 24, false, 0).unwrap();
        for n in 1..=50 {
            calc.calculate(&format!("10.0.{}.0", n), 24, false, 0).unwrap();
        }

        let again = calc.calculate("10.0.0.0", 24, false, 0).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(calc.cache_stats().evictions, 2);
    }

    #[test]
    fn test_custom_config() {
        let config = CalculatorConfig {
            cache_capacity: 2,
            default_max_ranges: 3,
            ..Default::default()
        };
        let mut calc = SubnetCalculator::with_config(config).unwrap();
        let info = calc.calculate_default("10.0.0.0", 24, true).unwrap();
        assert_eq!(info.subnet_ranges.ranges().map(|r| r.len()), Some(3));
        assert_eq!(calc.cache_stats().capacity, 2);
    }

    #[test]
    fn test_calculate_from_host_count() {
        let mut calc = SubnetCalculator::new().unwrap();
        let info = calc
            .calculate_from("192.168.1.0", PrefixSource::HostCount(50), false, 0)
            .unwrap();
        assert_eq!(info.cidr, 26);
        assert_eq!(info.usable_hosts, 62);
    }

    #[test]
    fn test_classify() {
        let calc = SubnetCalculator::new().unwrap();
        assert_eq!(calc.classify("172.16.0.1").unwrap(), IpClass::B);
        assert!(calc.classify("bogus").is_err());
    }
}
