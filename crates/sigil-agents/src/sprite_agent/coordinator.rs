// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The per-category load state machine.

use super::injector::SymbolInjector;
use super::metrics::SpriteMetrics;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use sigil_core::telemetry::MetricsResult;
use sigil_core::{
    Category, ChunkSource, CombinedAsset, LoadingState, LoadingStatus, SpriteError, SpriteHandle,
    SymbolSurface,
};
use sigil_data::SpriteCache;
use sigil_lanes::ChunkCombiner;
use sigil_telemetry::{MetricsRegistry, ScopedMetricTimer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type LoadResult = Result<SpriteHandle, SpriteError>;
type SharedLoad = Shared<BoxFuture<'static, LoadResult>>;

/// Everything mutated by `ensure_loaded`, kept under one lock so that the
/// cache check and the in-flight registration happen atomically.
#[derive(Default)]
struct LoadBook {
    cache: SpriteCache,
    states: HashMap<Category, LoadingState>,
    in_flight: HashMap<Category, SharedLoad>,
}

struct CoordinatorInner {
    source: Arc<dyn ChunkSource>,
    combiner: ChunkCombiner,
    injector: SymbolInjector,
    book: Mutex<LoadBook>,
    metrics: SpriteMetrics,
}

/// Drives loading per category and serves every concurrent caller from a
/// single fetch-and-combine operation.
///
/// States per category go `Idle → Loading → {Loaded | Failed}`. A call for a
/// failed category starts over from `Loading`. Cloning a coordinator is cheap
/// and every clone shares the same cache and bookkeeping.
#[derive(Clone)]
pub struct LoadCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl LoadCoordinator {
    /// Creates a coordinator fetching from `source` and publishing to `surface`.
    ///
    /// # Errors
    /// Fails if the sprite metrics cannot be registered in `metrics_registry`.
    pub fn new(
        source: Arc<dyn ChunkSource>,
        surface: Arc<dyn SymbolSurface>,
        metrics_registry: Arc<MetricsRegistry>,
    ) -> MetricsResult<Self> {
        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                source,
                combiner: ChunkCombiner::new(),
                injector: SymbolInjector::new(surface),
                book: Mutex::new(LoadBook::default()),
                metrics: SpriteMetrics::register(&metrics_registry)?,
            }),
        })
    }

    /// Ensures `category` is loaded and published, resolving to its sprite.
    ///
    /// The returned future is registered before this function returns: a cached
    /// sprite resolves immediately, a category already loading joins the
    /// running load, and anything else starts a new load on the tokio runtime.
    /// The load runs to completion even if every caller drops its future.
    ///
    /// # Panics
    /// Panics if a load must be started outside of a tokio runtime.
    pub fn ensure_loaded(&self, category: &Category) -> BoxFuture<'static, LoadResult> {
        let mut book = self.inner.lock_book();

        if let Some(handle) = book.cache.get(category).cloned() {
            drop(book);
            SpriteMetrics::bump(&self.inner.metrics.cache_hits_total);
            self.inner.injector.publish(category, &handle);
            return future::ready(Ok(handle)).boxed();
        }

        if let Some(load) = book.in_flight.get(category) {
            log::debug!("Joining in-flight load of '{category}'");
            return load.clone().boxed();
        }

        let load = self.start_load(category);
        book.in_flight.insert(category.clone(), load.clone());
        book.states.insert(category.clone(), LoadingState::Loading);
        load.boxed()
    }

    fn start_load(&self, category: &Category) -> SharedLoad {
        log::debug!("Starting load of '{category}'");
        SpriteMetrics::bump(&self.inner.metrics.loads_started_total);

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(CoordinatorInner::run_load(
            Arc::clone(&self.inner),
            category.clone(),
        ));
        let category = category.clone();

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    let err = SpriteError::Interrupted {
                        category: category.clone(),
                        message: e.to_string(),
                    };
                    inner.settle_failure(&category, &err);
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Snapshot of the state of `category`. Never triggers a load.
    pub fn loading_state(&self, category: &Category) -> LoadingStatus {
        self.inner
            .lock_book()
            .states
            .get(category)
            .map(LoadingState::status)
            .unwrap_or_default()
    }

    /// Returns `true` if `category` is cached and its symbols are published.
    pub fn is_ready(&self, category: &Category) -> bool {
        let cached = self.inner.lock_book().cache.has(category);
        cached && self.inner.injector.is_published(category)
    }

    /// Returns the cached sprite of `category`, if any.
    pub fn cached(&self, category: &Category) -> Option<SpriteHandle> {
        self.inner.lock_book().cache.get(category).cloned()
    }

    /// Seeds the cache with an already assembled sprite without publishing it.
    ///
    /// The next [`ensure_loaded`](Self::ensure_loaded) publishes it without
    /// fetching. If `category` is already cached the existing sprite is kept
    /// and returned. Returns `None` without touching anything while a load of
    /// `category` is in flight; that load decides what gets cached.
    pub fn warm(&self, category: Category, asset: CombinedAsset) -> Option<SpriteHandle> {
        let mut book = self.inner.lock_book();
        if book.in_flight.contains_key(&category) {
            log::debug!("Not warming '{category}' while it is loading");
            return None;
        }
        if let Some(existing) = book.cache.get(&category) {
            return Some(existing.clone());
        }

        let handle = SpriteHandle::new(asset);
        book.cache.set(category.clone(), handle.clone());
        book.states.insert(category, LoadingState::Loaded);
        self.inner.metrics.set_cached(book.cache.len());
        Some(handle)
    }

    /// Loads every category concurrently, logging failures instead of
    /// returning them. Resolves once every attempt has settled.
    pub async fn preload(&self, categories: &[Category]) {
        let loads = categories.iter().map(|category| {
            let category = category.clone();
            self.ensure_loaded(&category)
                .map(move |result| (category, result))
        });

        for (category, result) in future::join_all(loads).await {
            if let Err(e) = result {
                log::warn!("Preloading '{category}' failed: {e}");
            }
        }
    }

    /// The symbol injector publishing to the rendering surface.
    pub fn injector(&self) -> &SymbolInjector {
        &self.inner.injector
    }
}

impl CoordinatorInner {
    fn lock_book(&self) -> MutexGuard<'_, LoadBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_load(self: Arc<Self>, category: Category) -> LoadResult {
        let result = {
            let _timer = ScopedMetricTimer::new(&self.metrics.load_time_ms);
            self.fetch_and_combine(&category).await
        };

        match result {
            Ok(asset) => {
                let handle = SpriteHandle::new(asset);
                self.injector.publish(&category, &handle);
                let handle = self.commit(&category, handle);
                log::info!("Loaded sprite '{category}' ({} symbols)", handle.len());
                Ok(handle)
            }
            Err(err) => {
                self.settle_failure(&category, &err);
                Err(err)
            }
        }
    }

    async fn fetch_and_combine(&self, category: &Category) -> Result<CombinedAsset, SpriteError> {
        let count = self
            .source
            .chunk_count(category)
            .ok_or_else(|| SpriteError::ChunkNotFound {
                category: category.clone(),
                index: 1,
            })?;

        let fetches = (1..=count).map(|index| {
            SpriteMetrics::bump(&self.metrics.chunk_fetches_total);
            log::debug!("Fetching chunk {index}/{count} of '{category}'");
            self.source.fetch_chunk(category, index)
        });
        let chunks = future::join_all(fetches)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        self.combiner.combine(category, chunks)
    }

    /// Stores `handle` and marks `category` loaded, returning the handle that
    /// ends up cached.
    fn commit(&self, category: &Category, handle: SpriteHandle) -> SpriteHandle {
        let mut book = self.lock_book();
        let cached = match book.cache.get(category) {
            Some(existing) => existing.clone(),
            None => {
                book.cache.set(category.clone(), handle.clone());
                handle
            }
        };
        book.states.insert(category.clone(), LoadingState::Loaded);
        book.in_flight.remove(category);
        self.metrics.set_cached(book.cache.len());
        cached
    }

    fn settle_failure(&self, category: &Category, err: &SpriteError) {
        let mut book = self.lock_book();
        book.in_flight.remove(category);
        // A cached category stays `Loaded`.
        if !book.cache.has(category) {
            book.states
                .insert(category.clone(), LoadingState::Failed(err.to_string()));
        }
        drop(book);

        SpriteMetrics::bump(&self.metrics.loads_failed_total);
        log::error!("Failed to load sprite '{category}': {err}");
    }
}

impl std::fmt::Debug for LoadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let book = self.inner.lock_book();
        f.debug_struct("LoadCoordinator")
            .field("cached", &book.cache.len())
            .field("in_flight", &book.in_flight.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite_agent::DocumentSurface;
    use sigil_core::{ChunkContent, Symbol};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingSource {
        chunks: usize,
        fetches: AtomicUsize,
        delay: Duration,
        failing: AtomicBool,
    }

    #[async_trait::async_trait]
    impl ChunkSource for CountingSource {
        fn chunk_count(&self, category: &Category) -> Option<usize> {
            (category.as_str() == "status").then_some(self.chunks)
        }

        async fn fetch_chunk(
            &self,
            category: &Category,
            index: usize,
        ) -> Result<ChunkContent, SpriteError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(SpriteError::ChunkFetch {
                    category: category.clone(),
                    index,
                    message: "timed out".to_string(),
                });
            }
            Ok(ChunkContent::new(
                index,
                format!(
                    "<svg xmlns=\"http://www.w3.org/2000/svg\"><symbol id=\"{category}-{index}\"/></svg>"
                ),
            ))
        }
    }

    fn setup(chunks: usize) -> (Arc<CountingSource>, Arc<DocumentSurface>, LoadCoordinator) {
        setup_with(CountingSource {
            chunks,
            ..CountingSource::default()
        })
    }

    fn setup_with(
        source: CountingSource,
    ) -> (Arc<CountingSource>, Arc<DocumentSurface>, LoadCoordinator) {
        let source = Arc::new(source);
        let surface = Arc::new(DocumentSurface::new());
        let coordinator = LoadCoordinator::new(
            source.clone(),
            surface.clone(),
            Arc::new(MetricsRegistry::new()),
        )
        .unwrap();
        (source, surface, coordinator)
    }

    #[tokio::test]
    async fn state_goes_from_idle_to_loaded() {
        let (_, _, coordinator) = setup(2);
        let status = Category::new("status");

        assert_eq!(coordinator.loading_state(&status), LoadingStatus::default());

        let load = coordinator.ensure_loaded(&status);
        assert!(coordinator.loading_state(&status).loading);

        load.await.unwrap();
        let state = coordinator.loading_state(&status);
        assert!(state.loaded && !state.loading && state.error.is_none());
        assert!(coordinator.is_ready(&status));
    }

    #[tokio::test]
    async fn unconfigured_category_fails_without_fetching() {
        let (source, _, coordinator) = setup(2);
        let unknown = Category::new("unknown");

        let err = coordinator.ensure_loaded(&unknown).await.unwrap_err();
        assert!(matches!(err, SpriteError::ChunkNotFound { index: 1, .. }));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
        assert!(coordinator.loading_state(&unknown).error.is_some());
        assert!(coordinator.cached(&unknown).is_none());
    }

    #[tokio::test]
    async fn warmed_sprite_is_published_on_first_request() {
        let (source, surface, coordinator) = setup(2);
        let status = Category::new("status");
        let warmed = coordinator.warm(
            status.clone(),
            CombinedAsset::new(status.clone(), vec![Symbol::new("w", "<symbol id=\"w\"/>")]),
        )
        .unwrap();

        assert!(coordinator.loading_state(&status).loaded);
        assert!(!coordinator.is_ready(&status));
        assert!(!surface.container_created());

        let handle = coordinator.ensure_loaded(&status).await.unwrap();
        assert!(SpriteHandle::ptr_eq(&handle, &warmed));
        assert!(coordinator.is_ready(&status));
        assert_eq!(surface.symbol_occurrences("w"), 1);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn warm_keeps_an_existing_sprite() {
        let (_, _, coordinator) = setup(1);
        let status = Category::new("status");
        let loaded = coordinator.ensure_loaded(&status).await.unwrap();

        let kept = coordinator
            .warm(status.clone(), CombinedAsset::new(status.clone(), vec![]))
            .unwrap();
        assert!(SpriteHandle::ptr_eq(&loaded, &kept));
        assert_eq!(kept.len(), 1);
    }

    fn warm_symbol(category: &Category) -> CombinedAsset {
        CombinedAsset::new(category.clone(), vec![Symbol::new("w", "<symbol id=\"w\"/>")])
    }

    #[tokio::test(start_paused = true)]
    async fn warm_is_refused_while_a_load_succeeds() {
        let (_, surface, coordinator) = setup_with(CountingSource {
            chunks: 2,
            delay: Duration::from_millis(10),
            ..CountingSource::default()
        });
        let status = Category::new("status");

        let load = coordinator.ensure_loaded(&status);
        assert!(coordinator.warm(status.clone(), warm_symbol(&status)).is_none());

        let handle = load.await.unwrap();
        let cached = coordinator.cached(&status).unwrap();
        assert!(SpriteHandle::ptr_eq(&handle, &cached));
        let ids: Vec<&str> = cached.symbol_ids().collect();
        assert_eq!(ids, ["status-1", "status-2"]);
        assert_eq!(surface.symbol_occurrences("w"), 0);
        assert_eq!(surface.symbol_occurrences("status-1"), 1);
        assert!(coordinator.is_ready(&status));
    }

    #[tokio::test(start_paused = true)]
    async fn warm_during_a_failing_load_leaves_nothing_cached() {
        let (_, _, coordinator) = setup_with(CountingSource {
            chunks: 2,
            delay: Duration::from_millis(10),
            failing: AtomicBool::new(true),
            ..CountingSource::default()
        });
        let status = Category::new("status");

        let load = coordinator.ensure_loaded(&status);
        assert!(coordinator.warm(status.clone(), warm_symbol(&status)).is_none());
        assert!(load.await.is_err());

        let state = coordinator.loading_state(&status);
        assert!(!state.loaded && state.error.is_some());
        assert!(coordinator.cached(&status).is_none());
        assert!(!coordinator.is_ready(&status));
    }

    #[tokio::test]
    async fn warm_after_a_failed_load_marks_it_loaded() {
        let (source, _, coordinator) = setup_with(CountingSource {
            chunks: 1,
            failing: AtomicBool::new(true),
            ..CountingSource::default()
        });
        let status = Category::new("status");
        assert!(coordinator.ensure_loaded(&status).await.is_err());

        coordinator.warm(status.clone(), warm_symbol(&status)).unwrap();

        let state = coordinator.loading_state(&status);
        assert!(state.loaded && state.error.is_none());
        coordinator.ensure_loaded(&status).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }
}
