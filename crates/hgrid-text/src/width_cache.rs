#![forbid(unsafe_code)]

//! LRU width cache for text measurement.
//!
//! Device text measurement is the hot path of cell layout: truncation
//! measures every grapheme of an overflowing value, every frame. The cache
//! keys widths by `(font, text)` so repeated strings and glyphs are measured
//! once.
//!
//! # Example
//! ```
//! use hgrid_text::{CachedMeasure, MonospaceMeasure, TextMeasure};
//!
//! let mut m = CachedMeasure::new(MonospaceMeasure::new(10.0, 14.0), 1000);
//! assert_eq!(m.text_width("13px Tahoma", "abc"), 30.0);
//! assert_eq!(m.text_width("13px Tahoma", "abc"), 30.0);
//!
//! let stats = m.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//! ```

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHasher;

use crate::measure::TextMeasure;

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of text widths keyed by font and text.
///
/// Keys are 64-bit FxHash digests rather than owned strings.
#[derive(Debug)]
pub struct WidthCache {
    cache: LruCache<u64, f64>,
    hits: u64,
    misses: u64,
}

impl WidthCache {
    /// Create a cache with the given capacity (zero is treated as one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Get a cached width or compute and cache it.
    pub fn get_or_compute_with<F>(&mut self, font: &str, text: &str, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        let key = hash_key(font, text);
        if let Some(&width) = self.cache.get(&key) {
            self.hits += 1;
            return width;
        }
        self.misses += 1;
        let width = compute();
        self.cache.put(key, width);
        width
    }

    #[must_use]
    pub fn contains(&self, font: &str, text: &str) -> bool {
        self.cache.contains(&hash_key(font, text))
    }

    /// Drop every cached width, e.g. after a font face finishes loading.
    pub fn clear(&mut self) {
        tracing::trace!(entries = self.cache.len(), "width cache cleared");
        self.cache.clear();
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[inline]
fn hash_key(font: &str, text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    font.hash(&mut hasher);
    text.hash(&mut hasher);
    hasher.finish()
}

/// A [`TextMeasure`] that memoizes widths of an inner measurer.
///
/// Line heights are cached per font the same way.
#[derive(Debug)]
pub struct CachedMeasure<M> {
    inner: M,
    widths: WidthCache,
    heights: WidthCache,
}

impl<M: TextMeasure> CachedMeasure<M> {
    #[must_use]
    pub fn new(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            widths: WidthCache::new(capacity),
            heights: WidthCache::new(64),
        }
    }

    /// Width cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.widths.stats()
    }

    /// Drop all cached measurements, e.g. after fonts finished loading.
    pub fn clear(&mut self) {
        self.widths.clear();
        self.heights.clear();
    }

    #[must_use]
    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.inner
    }
}

impl<M: TextMeasure> TextMeasure for CachedMeasure<M> {
    fn text_width(&mut self, font: &str, text: &str) -> f64 {
        let inner = &mut self.inner;
        self.widths
            .get_or_compute_with(font, text, || inner.text_width(font, text))
    }

    fn text_height(&mut self, font: &str) -> f64 {
        let inner = &mut self.inner;
        self.heights
            .get_or_compute_with(font, "", || inner.text_height(font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MonospaceMeasure;

    #[derive(Default)]
    struct CountingMeasure {
        calls: usize,
    }

    impl TextMeasure for CountingMeasure {
        fn text_width(&mut self, _font: &str, text: &str) -> f64 {
            self.calls += 1;
            text.len() as f64
        }

        fn text_height(&mut self, _font: &str) -> f64 {
            self.calls += 1;
            12.0
        }
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = WidthCache::new(100);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().capacity, 100);
    }

    #[test]
    fn zero_capacity_becomes_one() {
        assert_eq!(WidthCache::new(0).stats().capacity, 1);
    }

    #[test]
    fn font_is_part_of_the_key() {
        let mut cache = WidthCache::new(10);
        cache.get_or_compute_with("12px A", "x", || 5.0);
        assert!(cache.contains("12px A", "x"));
        assert!(!cache.contains("14px A", "x"));
    }

    #[test]
    fn lru_eviction() {
        let mut cache = WidthCache::new(2);
        cache.get_or_compute_with("f", "a", || 1.0);
        cache.get_or_compute_with("f", "b", || 1.0);
        cache.get_or_compute_with("f", "a", || 1.0);
        cache.get_or_compute_with("f", "c", || 1.0);
        assert!(cache.contains("f", "a"));
        assert!(!cache.contains("f", "b"));
        assert!(cache.contains("f", "c"));
    }

    #[test]
    fn cached_measure_skips_inner_on_hit() {
        let mut m = CachedMeasure::new(CountingMeasure::default(), 16);
        assert_eq!(m.text_width("f", "hello"), 5.0);
        assert_eq!(m.text_width("f", "hello"), 5.0);
        assert_eq!(m.text_height("f"), 12.0);
        assert_eq!(m.text_height("f"), 12.0);
        assert_eq!(m.inner().calls, 2);
        assert_eq!(m.stats().hits, 1);
    }

    #[test]
    fn clear_forces_remeasure() {
        let mut m = CachedMeasure::new(CountingMeasure::default(), 16);
        m.text_width("f", "abc");
        m.clear();
        m.text_width("f", "abc");
        assert_eq!(m.inner().calls, 2);
    }

    #[test]
    fn hit_rate() {
        let mut m = CachedMeasure::new(MonospaceMeasure::default(), 16);
        assert_eq!(m.stats().hit_rate(), 0.0);
        m.text_width("f", "a");
        m.text_width("f", "a");
        m.text_width("f", "a");
        m.text_width("f", "a");
        assert!((m.stats().hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
