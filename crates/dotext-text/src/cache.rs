//! Glyph occupancy cache.
//!
//! Sampled glyph matrices are memoized by [`GlyphKey`] for the lifetime of the
//! cache. Entries are never evicted; the working set is bounded by the
//! character repertoire actually rendered.

use dotext_core::alloc::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use crate::matrix::OccupancyMatrix;

/// Key for cached glyph matrices.
///
/// Density, sampled edge and typeface are part of the key so matrices
/// sampled for different grid layouts or device pixel ratios never alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// Normalized sampling density.
    pub density: u32,
    /// Edge length of the sampled matrix (density scaled by the device pixel ratio).
    pub size: u32,
    /// Typeface family name.
    pub typeface: String,
    pub character: char,
}

impl GlyphKey {
    pub fn new(density: u32, size: u32, typeface: impl Into<String>, character: char) -> Self {
        Self {
            density,
            size,
            typeface: typeface.into(),
            character,
        }
    }
}

impl std::fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\0{}\0{}\0{}",
            self.density, self.size, self.typeface, self.character
        )
    }
}

/// Shared, thread-safe glyph matrix cache.
///
/// Cloning is cheap and clones share storage. Use [`GlyphCache::global`] for
/// the process-wide instance or [`GlyphCache::new`] for an isolated one.
#[derive(Clone, Default)]
pub struct GlyphCache {
    inner: Arc<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: RwLock<HashMap<GlyphKey, Arc<OccupancyMatrix>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

static GLOBAL_CACHE: OnceLock<GlyphCache> = OnceLock::new();

impl GlyphCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by every sampler that does not inject its own.
    pub fn global() -> &'static GlyphCache {
        GLOBAL_CACHE.get_or_init(GlyphCache::new)
    }

    /// Look up an entry without touching statistics.
    pub fn peek(&self, key: &GlyphKey) -> Option<Arc<OccupancyMatrix>> {
        self.read_entries(|entries| entries.get(key).cloned())
    }

    pub fn contains(&self, key: &GlyphKey) -> bool {
        self.read_entries(|entries| entries.contains_key(key))
    }

    /// Get a cached matrix or compute it.
    ///
    /// `compute` returning `None` marks a failed sample; nothing is cached and
    /// the miss is still counted.
    pub fn get_or_try_insert_with<F>(
        &self,
        key: GlyphKey,
        compute: F,
    ) -> Option<Arc<OccupancyMatrix>>
    where
        F: FnOnce() -> Option<OccupancyMatrix>,
    {
        if let Some(hit) = self.peek(&key) {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            return Some(hit);
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        let matrix = Arc::new(compute()?);

        let mut entries = match self.inner.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // A concurrent sampler may have won the race; keep the first entry.
        Some(entries.entry(key).or_insert(matrix).clone())
    }

    /// Number of cached matrices.
    pub fn len(&self) -> usize {
        self.read_entries(|entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.inner.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.inner.misses.load(Ordering::Relaxed)
    }

    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f32 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f32 / total as f32
        }
    }

    /// Drop every entry and reset statistics (useful when fonts are reloaded).
    pub fn clear(&self) {
        match self.inner.entries.write() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
        self.inner.hits.store(0, Ordering::Relaxed);
        self.inner.misses.store(0, Ordering::Relaxed);
    }

    /// Cache statistics as a formatted string.
    pub fn stats_string(&self) -> String {
        format!(
            "GlyphCache: {} entries, {:.1}% hit rate ({} hits, {} misses)",
            self.len(),
            self.hit_rate() * 100.0,
            self.hits(),
            self.misses()
        )
    }

    fn read_entries<R>(&self, f: impl FnOnce(&HashMap<GlyphKey, Arc<OccupancyMatrix>>) -> R) -> R {
        match self.inner.entries.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("len", &self.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> OccupancyMatrix {
        OccupancyMatrix::from_rows(&[[true, false]]).unwrap()
    }

    #[test]
    fn test_key_display() {
        let key = GlyphKey::new(16, 32, "SimSun", 'A');
        assert_eq!(key.to_string(), "16\u{0}32\u{0}SimSun\u{0}A");
        assert_ne!(key, GlyphKey::new(16, 16, "SimSun", 'A'));
    }

    #[test]
    fn test_hit_and_miss_accounting() {
        let cache = GlyphCache::new();
        let key = GlyphKey::new(16, 16, "SimSun", 'A');

        let first = cache.get_or_try_insert_with(key.clone(), || Some(matrix()));
        let second = cache.get_or_try_insert_with(key, || panic!("should be cached"));

        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_failed_compute_not_cached() {
        let cache = GlyphCache::new();
        let key = GlyphKey::new(8, 8, "serif", 'x');
        assert!(cache.get_or_try_insert_with(key.clone(), || None).is_none());
        assert!(!cache.contains(&key));
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_clones_share_storage_and_clear_resets() {
        let cache = GlyphCache::new();
        let other = cache.clone();
        cache.get_or_try_insert_with(GlyphKey::new(16, 16, "a", 'a'), || Some(matrix()));
        assert_eq!(other.len(), 1);

        other.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 0);
        assert!(cache.stats_string().starts_with("GlyphCache: 0 entries"));
    }
}
