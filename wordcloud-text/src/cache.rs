//! Memoising wrapper around any [`GlyphBoundsProvider`].
//!
//! Layout runs measure the same word at the same size over and over (every
//! orientation re-roll and every re-run with a new seed), and shaping is far
//! more expensive than a hash lookup.  Outlines are kept in an LRU keyed by
//! everything that influences them; errors are never cached.

use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxBuildHasher;
use wordcloud_core::{Orientation, Outline};

use crate::fonts::FontDescriptor;
use crate::provider::{GlyphBoundsProvider, MeasureError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    font: FontDescriptor,
    /// `f32::to_bits` of the size; sizes are produced deterministically so
    /// bit equality is the right notion here.
    size_bits: u32,
    orientation: Orientation,
}

/// LRU-cached provider.
pub struct CachedProvider<P> {
    inner: P,
    cache: LruCache<MeasureKey, Outline, FxBuildHasher>,
    hits: u64,
    misses: u64,
}

impl<P: GlyphBoundsProvider> CachedProvider<P> {
    /// Wrap `inner`, keeping at most `capacity` outlines (minimum 1).
    pub fn new(inner: P, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: LruCache::with_hasher(capacity, FxBuildHasher),
            hits: 0,
            misses: 0,
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: GlyphBoundsProvider> GlyphBoundsProvider for CachedProvider<P> {
    fn measure(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        size_px: f32,
        orientation: Orientation,
    ) -> Result<Outline, MeasureError> {
        let key = MeasureKey {
            text: text.to_string(),
            font: font.clone(),
            size_bits: size_px.to_bits(),
            orientation,
        };
        if let Some(outline) = self.cache.get(&key) {
            self.hits += 1;
            return Ok(outline.clone());
        }

        self.misses += 1;
        let outline = self.inner.measure(text, font, size_px, orientation)?;
        self.cache.put(key, outline.clone());
        Ok(outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedMetrics;

    #[test]
    fn test_repeat_measure_hits_cache() {
        let mut cached = CachedProvider::new(FixedMetrics::new(), 16);
        let font = FontDescriptor::default();
        let a = cached.measure("cache", &font, 20.0, Orientation::Horizontal).unwrap();
        let b = cached.measure("cache", &font, 20.0, Orientation::Horizontal).unwrap();
        assert_eq!(a, b);
        assert_eq!(cached.hits(), 1);
        assert_eq!(cached.misses(), 1);
        assert_eq!(cached.inner().measured_count(), 1);
    }

    #[test]
    fn test_key_distinguishes_size_and_orientation() {
        let mut cached = CachedProvider::new(FixedMetrics::new(), 16);
        let font = FontDescriptor::default();
        cached.measure("cache", &font, 20.0, Orientation::Horizontal).unwrap();
        cached.measure("cache", &font, 21.0, Orientation::Horizontal).unwrap();
        cached.measure("cache", &font, 20.0, Orientation::Vertical).unwrap();
        assert_eq!(cached.len(), 3);
        assert_eq!(cached.hits(), 0);
    }

    #[test]
    fn test_eviction_respects_capacity() {
        let mut cached = CachedProvider::new(FixedMetrics::new(), 2);
        let font = FontDescriptor::default();
        for word in ["one", "two", "three"] {
            cached.measure(word, &font, 20.0, Orientation::Horizontal).unwrap();
        }
        assert_eq!(cached.len(), 2);
        // "one" was evicted; measuring it again is a miss.
        cached.measure("one", &font, 20.0, Orientation::Horizontal).unwrap();
        assert_eq!(cached.misses(), 4);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cached = CachedProvider::new(FixedMetrics::new(), 4);
        let font = FontDescriptor::default();
        assert!(cached.measure(" ", &font, 20.0, Orientation::Horizontal).is_err());
        assert!(cached.measure(" ", &font, 20.0, Orientation::Horizontal).is_err());
        assert!(cached.is_empty());
        assert_eq!(cached.misses(), 2);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let mut cached = CachedProvider::new(FixedMetrics::new(), 0);
        let font = FontDescriptor::default();
        cached.measure("a", &font, 20.0, Orientation::Horizontal).unwrap();
        assert_eq!(cached.len(), 1);
    }
}
