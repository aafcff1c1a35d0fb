//! Content-addressed caching with pluggable eviction.
//!
//! [`CacheStrategy`] is the storage seam. Three implementations exist:
//!
//! - [`DisabledCache`]: always misses, stores nothing
//! - [`LruCache`]: evicts the least recently used entry
//! - [`LfuCache`]: evicts the least frequently used entry
//!
//! [`CacheManager`] layers the `tokens:`, `tree:` and `html:` namespaces over
//! one strategy instance and derives keys from a SHA-256 of the source text.
//!
//! ```
//! use markdown_lathe_engine::cache::{CacheStrategy, LruCache};
//!
//! let cache = LruCache::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get("a");
//! cache.set("c", 3); // evicts "b"
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.get("a"), Some(1));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod disabled;
mod lfu;
mod lru;
mod manager;

pub use disabled::DisabledCache;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use manager::{CacheManager, CachedValue, Namespace, content_key};

/// Default number of entries held by the LRU and LFU strategies.
pub const DEFAULT_CAPACITY: usize = 128;

/// A key-value store with an eviction policy.
///
/// Implementations lock internally for the duration of each call, so a
/// strategy can be shared between threads.
pub trait CacheStrategy<V>: Send + Sync {
    /// Look up a key, counting a hit or a miss.
    fn get(&self, key: &str) -> Option<V>;

    /// Insert or overwrite a key. Overwrites do not count as hits or misses.
    fn set(&self, key: &str, value: V);

    /// Drop `key` after a `get` returned a value the caller could not use.
    /// That lookup is recounted from a hit to a miss.
    fn discard(&self, key: &str);

    /// Drop every entry. Hit and miss counters are kept.
    fn clear(&self);

    fn stats(&self) -> CacheStats;
}

/// Counters reported by a [`CacheStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub strategy: StrategyKind,
    pub enabled: bool,
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: Option<usize>,
}

impl CacheStats {
    /// Fraction of lookups that hit, or 0 when nothing was looked up.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strategy={} enabled={} hits={} misses={} size={}",
            self.strategy, self.enabled, self.hits, self.misses, self.size
        )?;
        if let Some(capacity) = self.capacity {
            write!(f, " capacity={capacity}")?;
        }
        write!(f, " hit_ratio={:.2}", self.hit_ratio())
    }
}

/// Which eviction strategy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    None,
    #[default]
    Lru,
    Lfu,
}

impl StrategyKind {
    /// Build a boxed strategy of this kind. `capacity` is ignored for `None`.
    pub fn build<V>(self, capacity: usize) -> Box<dyn CacheStrategy<V>>
    where
        V: Clone + Send + 'static,
    {
        match self {
            StrategyKind::None => Box::new(DisabledCache),
            StrategyKind::Lru => Box::new(LruCache::new(capacity)),
            StrategyKind::Lfu => Box::new(LfuCache::new(capacity)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::None => "none",
            StrategyKind::Lru => "lru",
            StrategyKind::Lfu => "lfu",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cache strategy `{0}` (expected none, lru or lfu)")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "disabled" => Ok(StrategyKind::None),
            "lru" => Ok(StrategyKind::Lru),
            "lfu" => Ok(StrategyKind::Lfu),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Lock a strategy's state, recovering it if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
