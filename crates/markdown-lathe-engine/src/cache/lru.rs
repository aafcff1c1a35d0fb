use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{CacheStats, CacheStrategy, StrategyKind, lock};

/// Fixed-capacity cache that evicts the least recently used entry.
///
/// Recency is a monotonically increasing stamp per entry. `order` maps
/// stamps back to keys, so its first entry is always the eviction victim.
pub struct LruCache<V> {
    capacity: usize,
    state: Mutex<LruState<V>>,
}

struct LruState<V> {
    entries: HashMap<String, (V, u64)>,
    order: BTreeMap<u64, String>,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<V> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LruState {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                clock: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }
}

impl<V: Clone + Send> CacheStrategy<V> for LruCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;

        match state.entries.get_mut(key) {
            Some((value, stamp)) => {
                state.clock += 1;
                state.order.remove(stamp);
                *stamp = state.clock;
                state.order.insert(state.clock, key.to_string());
                state.hits += 1;
                Some(value.clone())
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    fn set(&self, key: &str, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut guard = lock(&self.state);
        let state = &mut *guard;
        state.clock += 1;

        if let Some((existing, stamp)) = state.entries.get_mut(key) {
            state.order.remove(stamp);
            *existing = value;
            *stamp = state.clock;
            state.order.insert(state.clock, key.to_string());
            return;
        }

        state.entries.insert(key.to_string(), (value, state.clock));
        state.order.insert(state.clock, key.to_string());

        if state.entries.len() > self.capacity
            && let Some((_, oldest)) = state.order.pop_first()
        {
            state.entries.remove(&oldest);
            log::trace!("lru evicted {oldest}");
        }
    }

    fn discard(&self, key: &str) {
        let mut guard = lock(&self.state);
        let state = &mut *guard;

        if let Some((_, stamp)) = state.entries.remove(key) {
            state.order.remove(&stamp);
        }
        state.hits = state.hits.saturating_sub(1);
        state.misses += 1;
    }

    fn clear(&self) {
        let mut state = lock(&self.state);
        state.entries.clear();
        state.order.clear();
    }

    fn stats(&self) -> CacheStats {
        let state = lock(&self.state);
        CacheStats {
            strategy: StrategyKind::Lru,
            enabled: true,
            hits: state.hits,
            misses: state.misses,
            size: state.entries.len(),
            capacity: Some(self.capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn discard_drops_entry_and_recounts_hit() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.discard("a");

        assert_eq!(cache.get("a"), None);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (0, 2, 1));

        cache.set("c", 3);
        cache.set("d", 4);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn get_after_set_returns_value() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("missing"), None);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.get("a");
        cache.set("c", 3);

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn overwrite_updates_value_and_recency_without_counting() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("a", 10);
        cache.set("c", 3);

        let before = cache.stats();
        assert_eq!((before.hits, before.misses), (0, 0));
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn clear_keeps_counters() {
        let cache = LruCache::new(2);
        cache.set("a", 1);
        cache.get("a");
        cache.clear();

        assert_eq!(cache.get("a"), None);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 0));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = LruCache::new(0);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.stats().size, 0);
    }

    proptest! {
        /// Inserting capacity + 1 distinct keys evicts exactly the first one.
        #[test]
        fn overflow_evicts_oldest(capacity in 1usize..16) {
            let cache = LruCache::new(capacity);
            for i in 0..=capacity {
                cache.set(&format!("k{i}"), i);
            }
            prop_assert_eq!(cache.stats().size, capacity);
            prop_assert_eq!(cache.get("k0"), None);
            for i in 1..=capacity {
                prop_assert_eq!(cache.get(&format!("k{i}")), Some(i));
            }
        }

        /// The touched key survives; the least recently touched one goes.
        #[test]
        fn touched_key_survives(capacity in 2usize..16, touched in 0usize..16) {
            let touched = touched % capacity;
            let cache = LruCache::new(capacity);
            for i in 0..capacity {
                cache.set(&format!("k{i}"), i);
            }
            cache.get(&format!("k{touched}"));
            cache.set("new", usize::MAX);

            let victim = if touched == 0 { 1 } else { 0 };
            prop_assert_eq!(cache.get(&format!("k{victim}")), None);
            prop_assert_eq!(cache.get(&format!("k{touched}")), Some(touched));
        }
    }
}
