//! Derived-view cache. The catalog view and the seed index depend only on the effect
//! collection and its sentinel rule, so both are rebuilt only when that content changes.
//! The cache is shared by reference: builds run without holding any lock, so readers of
//! the cached entry or the stats never wait on an index build.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use crate::data::effect::EffectCatalog;
use crate::parallel::WorkerPool;
use crate::roll::RollFunction;
use crate::search::aggregate::{build_seed_index_parallel, SeedIndex};
use crate::search::catalog::{catalog_view, SelectionItem};

/// Content fingerprint of everything the derived views depend on.
pub fn catalog_fingerprint(catalog: &EffectCatalog) -> u64 {
    let mut hasher = DefaultHasher::new();
    catalog.effects.hash(&mut hasher);
    catalog.sentinel.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
pub struct CachedViews {
    pub fingerprint: u64,
    pub items: Arc<Vec<SelectionItem>>,
    pub index: Arc<SeedIndex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub builds: u64,
}

#[derive(Debug)]
pub struct SeedCache<R> {
    roller: R,
    pool: WorkerPool,
    entry: RwLock<Option<CachedViews>>,
    hits: AtomicU64,
    builds: AtomicU64,
}

impl<R: RollFunction> SeedCache<R> {
    pub fn new(roller: R) -> Self {
        Self::with_pool(roller, WorkerPool::default())
    }

    pub fn with_pool(roller: R, pool: WorkerPool) -> Self {
        Self {
            roller,
            pool,
            entry: RwLock::new(None),
            hits: AtomicU64::new(0),
            builds: AtomicU64::new(0),
        }
    }

    /// Cached views for `catalog`, rebuilding both when its content differs from the cached one.
    /// Concurrent misses may each build; the last one stored wins.
    pub fn get_or_build(&self, catalog: &EffectCatalog) -> CachedViews {
        let fingerprint = catalog_fingerprint(catalog);
        if let Some(entry) = self.cached(fingerprint) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(fingerprint, "seed cache hit");
            return entry;
        }

        let entry = CachedViews {
            fingerprint,
            items: Arc::new(catalog_view(&catalog.effects, &catalog.sentinel)),
            index: Arc::new(build_seed_index_parallel(
                &catalog.effects,
                &self.roller,
                &catalog.sentinel,
                &self.pool,
            )),
        };
        let builds = self.builds.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(fingerprint, builds, "seed cache rebuilt");
        *self.entry.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(entry.clone());
        entry
    }

    /// The cached views, if they were built for `catalog`.
    pub fn peek(&self, catalog: &EffectCatalog) -> Option<CachedViews> {
        self.cached(catalog_fingerprint(catalog))
    }

    pub fn invalidate(&self) {
        *self.entry.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }

    fn cached(&self, fingerprint: u64) -> Option<CachedViews> {
        self.entry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .filter(|entry| entry.fingerprint == fingerprint)
            .cloned()
    }
}
