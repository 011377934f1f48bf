//! Shared server state: the loaded catalog and the derived views, published once built.

use std::sync::RwLock;

use tracing::info;

use crate::data::effect::EffectCatalog;
use crate::parallel::WorkerPool;
use crate::roll::SeededRoller;
use crate::search::{CacheStats, CachedViews, SeedCache, SelectionItem, SearchPanel};

#[derive(Debug)]
pub struct AppState {
    catalog: EffectCatalog,
    cache: SeedCache<SeededRoller>,
    views: RwLock<Option<CachedViews>>,
}

impl AppState {
    /// State whose views are not built yet; requests see `loading` until [AppState::build_views] runs.
    pub fn new(catalog: EffectCatalog, roller: SeededRoller, pool: WorkerPool) -> Self {
        Self {
            catalog,
            cache: SeedCache::with_pool(roller, pool),
            views: RwLock::new(None),
        }
    }

    /// State with views built on the calling thread.
    pub fn ready(catalog: EffectCatalog, roller: SeededRoller) -> Self {
        let state = Self::new(catalog, roller, WorkerPool::default());
        state.build_views();
        state
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    /// Build (or fetch from cache) the catalog view and seed index, then publish them.
    pub fn build_views(&self) -> CachedViews {
        let views = self.cache.get_or_build(&self.catalog);
        let mut published = self.views.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if published.is_none() {
            info!(
                items = views.items.len(),
                indexed = views.index.effect_count(),
                "search views ready"
            );
        }
        *published = Some(views.clone());
        views
    }

    pub fn views(&self) -> Option<CachedViews> {
        self.views
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.views().is_none()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// A fresh panel with `selected` applied. While loading the panel is disabled and empty.
    pub fn panel(&self, selected: &[&str]) -> SearchPanel {
        match self.views() {
            Some(views) => {
                let mut panel = SearchPanel::from_views(&views);
                panel.select(selected);
                panel
            }
            None => {
                let mut panel = SearchPanel::new(Vec::<SelectionItem>::new(), Default::default());
                panel.set_loading(true);
                panel
            }
        }
    }
}
