//! Route resolution caching.
//!
//! This module provides [`RouteCache`]: an LRU cache from destination path to
//! its resolved [`MatchStack`], so repeated navigations between the same
//! screens skip the pattern scan. It is gated behind the `cache` feature flag
//! and uses the [`lru`] crate internally.
//!
//! Misses are cached too: a path with no mounted route maps to `None`.
//!
//! The registry invalidates the whole cache whenever the mounted route set
//! changes. [`CacheStats`] tracks hits, misses, and invalidations.
//!
//! # Examples
//!
//! ```
//! use gpui_console_navigator::cache::RouteCache;
//! use gpui_console_navigator::MatchStack;
//!
//! let mut cache = RouteCache::new();
//! cache.insert("/orders".to_string(), Some(MatchStack::new()));
//!
//! assert!(cache.get("/orders").is_some());
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::resolve::MatchStack;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to resolve.
    pub misses: usize,
    /// Number of full cache invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for route resolution results.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Option<MatchStack>>,
    stats: CacheStats,
}

impl RouteCache {
    const DEFAULT_CAPACITY: usize = 1000;

    /// Create a cache with the default capacity (1000 entries).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity; zero falls back to one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Clear the cache and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up a cached resolution.
    ///
    /// The outer `None` is a cache miss; `Some(None)` is a cached "no route".
    pub fn get(&mut self, path: &str) -> Option<Option<MatchStack>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for path: '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for path: '{}'", path);
            None
        }
    }

    /// Store the resolution of `path`.
    pub fn insert(&mut self, path: String, stack: Option<MatchStack>) {
        self.entries.push(path, stack);
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Return the number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RouteCache {
    fn clone(&self) -> Self {
        Self {
            entries: LruCache::new(self.entries.cap()),
            stats: self.stats.clone(),
        }
    }
}
