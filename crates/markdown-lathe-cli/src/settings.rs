use anyhow::{Context, Result};
use markdown_lathe_config::Config;
use markdown_lathe_engine::cache::CacheManager;
use markdown_lathe_engine::{Engine, StrategyKind};

use crate::cli::Cli;

/// Effective settings: config file values overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub strategy: StrategyKind,
    pub capacity: usize,
    pub pretty: bool,
    pub indent: usize,
    pub repeat: usize,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let strategy = match cli.cache {
            Some(strategy) => strategy,
            None => config
                .cache
                .strategy
                .parse::<StrategyKind>()
                .context("invalid cache.strategy in config")?,
        };

        Ok(Self {
            strategy,
            capacity: cli.capacity.unwrap_or(config.cache.capacity),
            pretty: config.render.pretty,
            indent: config.render.indent,
            repeat: config.bench.repeat,
        })
    }

    pub fn engine(&self) -> Engine {
        let cache = CacheManager::from_kind(self.strategy, self.capacity);
        Engine::new(cache).with_indent(self.indent)
    }
}
