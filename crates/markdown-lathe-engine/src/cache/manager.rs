use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use markdown_lathe_syntax::{Document, OwnedToken};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{CacheStats, CacheStrategy, DEFAULT_CAPACITY, StrategyKind};
use crate::render::structure;

/// Logical partition of the cache. Each namespace prefixes its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Tokens,
    Tree,
    Html,
    HtmlCompact,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Tokens => "tokens:",
            Namespace::Tree => "tree:",
            Namespace::Html => "html:",
            Namespace::HtmlCompact => "html-compact:",
        }
    }

    fn html(pretty: bool) -> Self {
        if pretty {
            Namespace::Html
        } else {
            Namespace::HtmlCompact
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches(':'))
    }
}

/// Cache key for `text` in `namespace`: the prefix followed by the
/// hex-encoded SHA-256 of the UTF-8 bytes.
pub fn content_key(namespace: Namespace, text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{}{}", namespace.prefix(), hex::encode(digest))
}

/// A value stored by [`CacheManager`]. Shared so hits only bump a refcount.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Tokens(Arc<[OwnedToken]>),
    /// Structural form of a document; see [`crate::render::structure`].
    Tree(Arc<Value>),
    Html(Arc<str>),
}

/// Namespaced, content-addressed cache over one strategy instance.
pub struct CacheManager {
    strategy: Box<dyn CacheStrategy<CachedValue>>,
    enabled: AtomicBool,
}

impl CacheManager {
    pub fn new(strategy: Box<dyn CacheStrategy<CachedValue>>) -> Self {
        Self {
            strategy,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn from_kind(kind: StrategyKind, capacity: usize) -> Self {
        Self::new(kind.build(capacity))
    }

    /// Turn bypass mode off (`false`) or back on. While bypassed, lookups
    /// miss without touching the strategy and stores are dropped.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn get_tokens(&self, text: &str) -> Option<Arc<[OwnedToken]>> {
        match self.lookup(Namespace::Tokens, text)? {
            CachedValue::Tokens(tokens) => Some(tokens),
            other => self.invalid(Namespace::Tokens, text, format_args!("holds {other:?}")),
        }
    }

    pub fn set_tokens(&self, text: &str, tokens: Arc<[OwnedToken]>) {
        self.store(Namespace::Tokens, text, CachedValue::Tokens(tokens));
    }

    /// Cached tree for `text`. An entry that no longer deserializes is
    /// dropped and counted as a miss.
    pub fn get_tree(&self, text: &str) -> Option<Document> {
        match self.lookup(Namespace::Tree, text)? {
            CachedValue::Tree(value) => match structure::from_value(&value) {
                Ok(document) => Some(document),
                Err(err) => self.invalid(Namespace::Tree, text, err),
            },
            other => self.invalid(Namespace::Tree, text, format_args!("holds {other:?}")),
        }
    }

    pub fn set_tree(&self, text: &str, document: &Document) {
        if !self.is_enabled() {
            return;
        }
        let value = structure::to_value(document);
        self.store(Namespace::Tree, text, CachedValue::Tree(Arc::new(value)));
    }

    pub fn get_html(&self, text: &str, pretty: bool) -> Option<Arc<str>> {
        let namespace = Namespace::html(pretty);
        match self.lookup(namespace, text)? {
            CachedValue::Html(html) => Some(html),
            other => self.invalid(namespace, text, format_args!("holds {other:?}")),
        }
    }

    pub fn set_html(&self, text: &str, pretty: bool, html: Arc<str>) {
        self.store(Namespace::html(pretty), text, CachedValue::Html(html));
    }

    /// Strategy counters, with `enabled` also reflecting bypass mode.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.strategy.stats();
        stats.enabled &= self.is_enabled();
        stats
    }

    /// Drop every entry in every namespace.
    pub fn clear(&self) {
        self.strategy.clear();
        log::debug!("cache cleared");
    }

    fn lookup(&self, namespace: Namespace, text: &str) -> Option<CachedValue> {
        if !self.is_enabled() {
            return None;
        }
        let found = self.strategy.get(&content_key(namespace, text));
        match found {
            Some(_) => log::debug!("cache hit in {namespace}"),
            None => log::debug!("cache miss in {namespace}"),
        }
        found
    }

    fn store(&self, namespace: Namespace, text: &str, value: CachedValue) {
        if self.is_enabled() {
            self.strategy.set(&content_key(namespace, text), value);
        }
    }

    /// Drop an entry the lookup could not use, so it counts as a miss.
    fn invalid<T>(&self, namespace: Namespace, text: &str, cause: impl fmt::Display) -> Option<T> {
        log::warn!("cache entry invalid in {namespace}: {cause}");
        self.strategy.discard(&content_key(namespace, text));
        None
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::from_kind(StrategyKind::default(), DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("stats", &self.stats())
            .finish()
    }
}
