//! Measures how much the cache buys for a given input.
//!
//! One cycle is `parse` followed by pretty `render_html`. The meter runs the
//! cycle `repeat` times with the cache bypassed, then `repeat` times with it
//! restored, and reports both averages plus the hits and misses recorded
//! during the cached phase.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cache::CacheManager;
use crate::engine::{Engine, EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EfficiencyReport {
    pub repeat: usize,
    pub avg_uncached: Duration,
    pub avg_cached: Duration,
    /// `avg_uncached / avg_cached`, or `None` when the cached average is zero.
    pub speedup: Option<f64>,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
}

impl fmt::Display for EfficiencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "repeat:       {}", self.repeat)?;
        writeln!(f, "avg uncached: {:?}", self.avg_uncached)?;
        writeln!(f, "avg cached:   {:?}", self.avg_cached)?;
        match self.speedup {
            Some(speedup) => writeln!(f, "speedup:      {speedup:.2}x")?,
            None => writeln!(f, "speedup:      n/a")?,
        }
        write!(
            f,
            "hits:         {}\nmisses:       {}\nhit ratio:    {:.2}",
            self.hits, self.misses, self.hit_ratio
        )
    }
}

pub struct CacheEfficiencyMeter<'e> {
    engine: &'e Engine,
}

impl<'e> CacheEfficiencyMeter<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    /// Run both phases over `text`. A `repeat` of 0 runs one cycle each.
    pub fn measure(&self, text: &str, repeat: usize) -> Result<EfficiencyReport, EngineError> {
        let repeat = repeat.max(1);
        let cache = self.engine.cache();

        let avg_uncached = {
            let _bypass = Bypass::new(cache);
            self.run(text, repeat)?
        };

        let before = cache.stats();
        let avg_cached = self.run(text, repeat)?;
        let after = cache.stats();

        let hits = after.hits.saturating_sub(before.hits);
        let misses = after.misses.saturating_sub(before.misses);
        let lookups = hits + misses;
        let hit_ratio = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };
        let speedup =
            (!avg_cached.is_zero()).then(|| avg_uncached.as_secs_f64() / avg_cached.as_secs_f64());

        log::info!("measured {repeat} cycles: uncached {avg_uncached:?}, cached {avg_cached:?}");

        Ok(EfficiencyReport {
            repeat,
            avg_uncached,
            avg_cached,
            speedup,
            hits,
            misses,
            hit_ratio,
        })
    }

    fn run(&self, text: &str, repeat: usize) -> Result<Duration, EngineError> {
        let start = Instant::now();
        for _ in 0..repeat {
            self.engine.parse(text)?;
            self.engine.render_html(text, true)?;
        }
        Ok(start.elapsed().div_f64(repeat as f64))
    }
}

/// Bypasses the cache until dropped, then restores the previous setting.
struct Bypass<'c> {
    cache: &'c CacheManager,
    previous: bool,
}

impl<'c> Bypass<'c> {
    fn new(cache: &'c CacheManager) -> Self {
        let previous = cache.is_enabled();
        cache.set_enabled(false);
        Self { cache, previous }
    }
}

impl Drop for Bypass<'_> {
    fn drop(&mut self) {
        self.cache.set_enabled(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StrategyKind;
    use pretty_assertions::assert_eq;

    fn engine(kind: StrategyKind) -> Engine {
        Engine::new(CacheManager::from_kind(kind, 32))
    }

    #[test]
    fn cached_phase_hits_after_first_cycle() {
        let engine = engine(StrategyKind::Lru);
        let report = CacheEfficiencyMeter::new(&engine)
            .measure("# Title\n\nSome **text**", 5)
            .unwrap();

        assert_eq!(report.repeat, 5);
        // First cycle: tree, tokens and html miss; render_html's parse hits
        // the tree just stored. Every later cycle hits tree and html.
        assert_eq!(report.misses, 3);
        assert_eq!(report.hits, 1 + 4 * 2);
        assert!(report.hit_ratio > 0.7);
        assert!(engine.cache().is_enabled());
    }

    #[test]
    fn zero_repeat_runs_once() {
        let engine = engine(StrategyKind::Lfu);
        let report = CacheEfficiencyMeter::new(&engine).measure("x", 0).unwrap();
        assert_eq!(report.repeat, 1);
    }

    #[test]
    fn disabled_strategy_never_hits() {
        let engine = engine(StrategyKind::None);
        let report = CacheEfficiencyMeter::new(&engine).measure("x", 3).unwrap();
        assert_eq!((report.hits, report.misses), (0, 0));
        assert_eq!(report.hit_ratio, 0.0);
    }

    #[test]
    fn failing_cycle_restores_cache_switch() {
        let engine = engine(StrategyKind::Lru);
        let result = CacheEfficiencyMeter::new(&engine).measure("[open", 2);

        assert!(matches!(result, Err(EngineError::Parse(_))));
        assert!(engine.cache().is_enabled());
    }
}
