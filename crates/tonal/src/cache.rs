//! Memoized palette generation.
//!
//! [`PaletteCache`] keys results by the seed's bit pattern and the viewing
//! conditions' [`ViewingSignature`]. Readers load an immutable snapshot of
//! the map through [`ArcSwap`] and never block. Misses, evictions and
//! invalidations serialize on a mutex and publish a new snapshot.
//!
//! The cache is generic over a [`PaletteSource`], so the same machinery
//! memoizes single palettes, palette families, or a counting stub in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tonal_colorspace::Tristimulus;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::family::{FamilyGenerator, TonalPalettes};
use crate::palette::{TonalPalette, TonalPaletteGenerator};
use crate::viewing::{ViewingConditions, ViewingSignature};

/// Default number of cached seeds.
pub const DEFAULT_CAPACITY: usize = 8;

/// Something that turns a seed into a cacheable value.
pub trait PaletteSource: Send + Sync {
    type Output: Send + Sync;

    fn generate(&self, seed: Tristimulus, vc: &ViewingConditions) -> Self::Output;
}

impl PaletteSource for TonalPaletteGenerator {
    type Output = TonalPalette;

    fn generate(&self, seed: Tristimulus, vc: &ViewingConditions) -> TonalPalette {
        TonalPaletteGenerator::generate(self, seed, vc)
    }
}

impl PaletteSource for FamilyGenerator {
    type Output = TonalPalettes;

    fn generate(&self, seed: Tristimulus, vc: &ViewingConditions) -> TonalPalettes {
        FamilyGenerator::generate(self, seed, vc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    seed: [u64; 3],
    viewing: ViewingSignature,
}

impl CacheKey {
    fn new(seed: Tristimulus, vc: &ViewingConditions) -> Self {
        Self {
            seed: seed.to_bits(),
            viewing: vc.signature(),
        }
    }
}

struct Slot<T> {
    value: Arc<T>,
    last_access: AtomicU64,
}

/// Hit and miss counts since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Capacity-bounded, least-recently-used palette cache.
pub struct PaletteCache<S: PaletteSource = TonalPaletteGenerator> {
    source: S,
    capacity: usize,
    entries: ArcSwap<HashMap<CacheKey, Arc<Slot<S::Output>>>>,
    write: Mutex<()>,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: PaletteSource> PaletteCache<S> {
    pub fn new(source: S) -> Self {
        Self::build(source, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(source: S, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }
        Ok(Self::build(source, capacity))
    }

    fn build(source: S, capacity: usize) -> Self {
        Self {
            source,
            capacity,
            entries: ArcSwap::from_pointee(HashMap::new()),
            write: Mutex::new(()),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Whether `seed` under `vc` is cached, without touching recency.
    pub fn contains(&self, seed: Tristimulus, vc: &ViewingConditions) -> bool {
        self.entries.load().contains_key(&CacheKey::new(seed, vc))
    }

    /// Returns the cached value for `seed` under `vc`, generating it on a
    /// miss. Repeated calls return the same `Arc`.
    pub fn get(&self, seed: Tristimulus, vc: &ViewingConditions) -> Arc<S::Output> {
        let key = CacheKey::new(seed, vc);
        if let Some(value) = self.lookup(&key) {
            return value;
        }

        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        // another writer may have filled it while we waited
        if let Some(value) = self.lookup(&key) {
            return value;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(seed = ?seed, "palette cache miss");
        let value = Arc::new(self.source.generate(seed, vc));

        let mut next = HashMap::clone(&self.entries.load());
        while next.len() >= self.capacity {
            let oldest = next
                .iter()
                .min_by_key(|(_, slot)| slot.last_access.load(Ordering::Relaxed))
                .map(|(k, _)| *k);
            match oldest {
                Some(k) => {
                    next.remove(&k);
                    debug!("palette cache evicted least recently used entry");
                }
                None => break,
            }
        }
        next.insert(
            key,
            Arc::new(Slot {
                value: Arc::clone(&value),
                last_access: AtomicU64::new(self.tick()),
            }),
        );
        self.entries.store(Arc::new(next));
        value
    }

    /// Drops every entry computed under viewing conditions other than `vc`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, vc: &ViewingConditions) -> usize {
        let keep = vc.signature();
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.entries.load_full();
        let next: HashMap<_, _> = current
            .iter()
            .filter(|(k, _)| k.viewing == keep)
            .map(|(k, v)| (*k, Arc::clone(v)))
            .collect();
        let removed = current.len() - next.len();
        if removed > 0 {
            self.entries.store(Arc::new(next));
        }
        debug!(removed, "palette cache invalidated");
        removed
    }

    pub fn clear(&self) {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        self.entries.store(Arc::new(HashMap::new()));
        debug!("palette cache cleared");
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<S::Output>> {
        let entries = self.entries.load();
        let slot = entries.get(key)?;
        slot.last_access.store(self.tick(), Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("palette cache hit");
        Some(Arc::clone(&slot.value))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl<S: PaletteSource + std::fmt::Debug> std::fmt::Debug for PaletteCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteCache")
            .field("source", &self.source)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
