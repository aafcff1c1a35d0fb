use super::{CacheStats, CacheStrategy, StrategyKind};

/// No-op [`CacheStrategy`] that never stores or retrieves data.
///
/// Every `get` returns `None` without counting a miss; every `set` is
/// silently discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCache;

impl<V> CacheStrategy<V> for DisabledCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn set(&self, _key: &str, _value: V) {}

    fn discard(&self, _key: &str) {}

    fn clear(&self) {}

    fn stats(&self) -> CacheStats {
        CacheStats {
            strategy: StrategyKind::None,
            enabled: false,
            hits: 0,
            misses: 0,
            size: 0,
            capacity: None,
        }
    }
}
