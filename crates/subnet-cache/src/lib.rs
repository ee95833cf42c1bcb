//! Bounded in-memory stores for subnet calculations
//!
//! - [`CalculationCache`]: memoized results keyed by request, FIFO eviction
//! - [`history::HistoryStore`]: recent calculation summaries, newest first
//!
//! # Architecture
//!
//! - Lookups never refresh an entry's position, so eviction order is pure
//!   insertion order (FIFO), not recency
//! - No TTL; entries live until evicted or the cache is cleared
//! - Single owner with `&mut self` access; wrap in a `Mutex` to share
//!
//! # Examples
//!
//! ```
//! use subnet_cache::{CacheKey, CalculationCache};
//!
//! let mut cache = CalculationCache::new(50)?;
//! let key = CacheKey::new("10.0.0.0", 16, true, 100);
//! assert!(cache.get(&key).is_none());
//!
//! let stats = cache.stats();
//! assert_eq!(stats.misses, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use subnet_core::SubnetInfo;
use thiserror::Error;
use tracing::debug;

pub mod history;

/// Cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache could not be built
    #[error("Cache error: {0}")]
    OperationFailed(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Identity of a calculation request
///
/// The address is kept exactly as given, so equivalent spellings or
/// different range caps are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub address: String,
    pub prefix: u8,
    pub include_ranges: bool,
    pub max_ranges: u64,
}

impl CacheKey {
    pub fn new(address: &str, prefix: u8, include_ranges: bool, max_ranges: u64) -> Self {
        Self {
            address: address.to_string(),
            prefix,
            include_ranges,
            max_ranges,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}|{}|{}",
            self.address, self.prefix, self.include_ranges, self.max_ranges
        )
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Bounded FIFO cache of calculation results
pub struct CalculationCache {
    entries: LruCache<CacheKey, Arc<SubnetInfo>>,
    stats: CacheStats,
}

impl CalculationCache {
    /// Create a new cache
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of entries kept
    pub fn new(capacity: usize) -> Result<Self> {
        let cap = NonZeroUsize::new(capacity)
            .ok_or_else(|| CacheError::OperationFailed("Capacity must be > 0".to_string()))?;

        Ok(Self {
            entries: LruCache::new(cap),
            stats: CacheStats {
                capacity,
                ..Default::default()
            },
        })
    }

    /// Look up a stored result
    ///
    /// Returns the same `Arc` that was stored. Does not change eviction order.
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<SubnetInfo>> {
        match self.entries.peek(key) {
            Some(info) => {
                self.stats.hits += 1;
                debug!(key = %key, "cache hit");
                Some(Arc::clone(info))
            }
            None => {
                self.stats.misses += 1;
                debug!(key = %key, "cache miss");
                None
            }
        }
    }

    /// Store a result, evicting the oldest entry when full
    pub fn insert(&mut self, key: CacheKey, info: Arc<SubnetInfo>) {
        if let Some((old_key, _)) = self.entries.push(key.clone(), info) {
            if old_key != key {
                self.stats.evictions += 1;
                debug!(evicted = %old_key, "cache eviction");
            }
        }
        self.stats.size = self.entries.len();
    }

    /// Whether a key is cached, without touching statistics
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.size = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn capacity(&self) -> usize {
        self.stats.capacity
    }
}
