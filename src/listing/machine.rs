//! Async orchestration of the two listings.
//!
//! Each listing sits behind its own mutex. Checking the status, applying
//! the `Begin` transition and capturing the sequencing token happen in one
//! critical section, which is what keeps at most one `load_more` in flight
//! per listing on a multi-threaded runtime. The lock is never held across
//! an `.await`.
//!
//! Every first-page load, refresh and reset bumps the listing's token.
//! A response is applied only if the token it captured is still current;
//! superseded requests are allowed to finish and their results dropped.
//! Loads split into a synchronous `begin`, which takes the token, and an
//! async `run`, so a caller can fix the order of loads before spawning them.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{CatalogError, CatalogSource, Page};
use crate::mvi::Reducer;

use super::cache::{CachedListing, ListingCache};
use super::intent::{ListingIntent, LoadMode};
use super::reducer::ListingReducer;
use super::state::{ListingKind, ListingState, ListingStatus, PageSet};

/// What happened to a load request.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Response arrived and was merged into the listing.
    Applied,
    /// Guard rejected the call; no request was made.
    Skipped,
    /// A newer load or reset replaced this one; response discarded.
    Superseded,
    /// Request failed; listing is in `Error` with prior data kept.
    Failed(CatalogError),
}

/// A load whose `Begin` transition and token are already taken; the
/// request itself has not been sent yet.
#[derive(Debug)]
pub(crate) struct PendingLoad {
    kind: ListingKind,
    mode: LoadMode,
    generation: u64,
    query: Option<String>,
    page: u32,
}

#[derive(Default)]
struct Slot {
    state: ListingState,
    generation: u64,
    /// Data to restore if the in-flight first-page load or refresh fails.
    fallback: Option<PageSet>,
}

impl Slot {
    fn apply(&mut self, intent: ListingIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = ListingReducer::reduce(state, intent);
    }
}

pub struct ListingMachine {
    catalog: Arc<dyn CatalogSource>,
    slots: [Mutex<Slot>; 2],
    cache: Option<ListingCache>,
}

impl ListingMachine {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog,
            slots: [Mutex::new(Slot::default()), Mutex::new(Slot::default())],
            cache: None,
        }
    }

    /// Persist every successfully merged page to `cache`.
    pub fn with_cache(mut self, cache: ListingCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn slot(&self, kind: ListingKind) -> &Mutex<Slot> {
        &self.slots[kind.index()]
    }

    /// Clone of the current state for rendering.
    pub fn snapshot(&self, kind: ListingKind) -> ListingState {
        self.slot(kind).lock().state.clone()
    }

    /// Current sequencing token for `kind`.
    pub fn generation(&self, kind: ListingKind) -> u64 {
        self.slot(kind).lock().generation
    }

    /// Replace the listing with page 1, hiding current items while loading.
    ///
    /// `query` is required for search (falls back to the last query) and
    /// ignored for browse.
    pub async fn load_first_page(&self, kind: ListingKind, query: Option<&str>) -> LoadOutcome {
        self.start_over(kind, query, LoadMode::FirstPage).await
    }

    /// Like [`load_first_page`](Self::load_first_page) but current items
    /// stay visible until the new page arrives, and come back on failure.
    pub async fn refresh(&self, kind: ListingKind, query: Option<&str>) -> LoadOutcome {
        self.start_over(kind, query, LoadMode::Refresh).await
    }

    /// Append the next page if one exists and nothing else is loading.
    pub async fn load_more(&self, kind: ListingKind) -> LoadOutcome {
        match self.begin_more(kind) {
            Some(pending) => self.run(pending).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Drop everything loaded for `kind` and invalidate in-flight responses.
    pub fn reset(&self, kind: ListingKind) {
        {
            let mut slot = self.slot(kind).lock();
            slot.generation += 1;
            slot.fallback = None;
            slot.apply(ListingIntent::Reset);
            tracing::debug!(kind = %kind, generation = slot.generation, "Listing reset");
        }
        if let Some(cache) = &self.cache {
            cache.clear(kind);
        }
    }

    /// Seed `kind` from the on-disk cache. Returns whether anything was restored.
    pub fn restore_cached(&self, kind: ListingKind) -> bool {
        let Some(cached) = self.cache.as_ref().and_then(|c| c.load(kind)) else {
            return false;
        };
        let count = cached.items.len();
        let mut slot = self.slot(kind).lock();
        let before = slot.state.clone();
        slot.apply(ListingIntent::Restore(cached));
        let restored = slot.state != before;
        if restored {
            tracing::info!(kind = %kind, items = count, "Restored cached listing");
        }
        restored
    }

    async fn start_over(&self, kind: ListingKind, query: Option<&str>, mode: LoadMode) -> LoadOutcome {
        match self.begin(kind, query, mode) {
            Some(pending) => self.run(pending).await,
            None => LoadOutcome::Skipped,
        }
    }

    /// Apply `Begin` for a first-page load or refresh and take a fresh
    /// token, without awaiting anything. Loads begun later supersede this
    /// one no matter which task runs first. `None` when a search has no
    /// query to run.
    pub(crate) fn begin(
        &self,
        kind: ListingKind,
        query: Option<&str>,
        mode: LoadMode,
    ) -> Option<PendingLoad> {
        let mut slot = self.slot(kind).lock();
        let query = match kind {
            ListingKind::Browse => None,
            ListingKind::Search => query
                .map(str::to_string)
                .or_else(|| slot.state.last_query.clone())
                .filter(|q| !q.trim().is_empty()),
        };
        if kind == ListingKind::Search && query.is_none() {
            tracing::warn!(mode = ?mode, "Search load requested without a query");
            return None;
        }

        // A load superseding another in-flight one keeps the original
        // fallback; the visible state is already partially torn down.
        if slot.state.status != ListingStatus::Loading {
            slot.fallback = slot.state.page_set();
        }
        slot.generation += 1;
        slot.apply(ListingIntent::Begin {
            mode,
            query: query.clone(),
        });

        tracing::debug!(
            kind = %kind,
            mode = ?mode,
            query = query.as_deref().unwrap_or(""),
            generation = slot.generation,
            "Loading first page"
        );
        Some(PendingLoad {
            kind,
            mode,
            generation: slot.generation,
            query,
            page: 1,
        })
    }

    fn begin_more(&self, kind: ListingKind) -> Option<PendingLoad> {
        let mut slot = self.slot(kind).lock();
        if !slot.state.can_load_more() {
            tracing::trace!(
                kind = %kind,
                status = ?slot.state.status,
                current_page = slot.state.current_page,
                total_pages = slot.state.total_pages,
                "load_more ignored"
            );
            return None;
        }
        let page = slot.state.current_page + 1;
        slot.apply(ListingIntent::Begin {
            mode: LoadMode::More,
            query: None,
        });
        tracing::debug!(kind = %kind, page, generation = slot.generation, "Loading next page");
        Some(PendingLoad {
            kind,
            mode: LoadMode::More,
            generation: slot.generation,
            query: slot.state.last_query.clone(),
            page,
        })
    }

    /// Send the request for a begun load and apply its result if the token
    /// is still current.
    pub(crate) async fn run(&self, pending: PendingLoad) -> LoadOutcome {
        let result = self
            .fetch(pending.kind, pending.query.as_deref(), pending.page)
            .await;
        self.complete(
            pending.kind,
            pending.generation,
            pending.mode,
            pending.page,
            result,
        )
    }

    async fn fetch(
        &self,
        kind: ListingKind,
        query: Option<&str>,
        page: u32,
    ) -> Result<Page, CatalogError> {
        match kind {
            ListingKind::Browse => self.catalog.fetch_popular(page).await,
            ListingKind::Search => {
                self.catalog
                    .search_by_title(query.unwrap_or_default(), page)
                    .await
            }
        }
    }

    fn complete(
        &self,
        kind: ListingKind,
        generation: u64,
        mode: LoadMode,
        requested: u32,
        result: Result<Page, CatalogError>,
    ) -> LoadOutcome {
        let mut slot = self.slot(kind).lock();
        if slot.generation != generation {
            tracing::debug!(
                kind = %kind,
                stale = generation,
                current = slot.generation,
                page = requested,
                "Discarding superseded response"
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                let received = page.items.len();
                slot.fallback = None;
                slot.apply(ListingIntent::Loaded {
                    mode,
                    page,
                    requested,
                });
                tracing::debug!(
                    kind = %kind,
                    page = slot.state.current_page,
                    total_pages = slot.state.total_pages,
                    received,
                    items = slot.state.items.len(),
                    status = ?slot.state.status,
                    "Page applied"
                );
                // Queued under the slot lock so cache writes follow apply order.
                if let Some(cache) = &self.cache {
                    cache.save(&CachedListing::from_state(kind, &slot.state));
                }
                LoadOutcome::Applied
            }
            Err(err) => {
                let restore = match mode {
                    LoadMode::More => None,
                    LoadMode::FirstPage | LoadMode::Refresh => slot.fallback.take(),
                };
                slot.apply(ListingIntent::Failed {
                    mode,
                    message: err.to_string(),
                    restore,
                });
                tracing::warn!(
                    kind = %kind,
                    page = requested,
                    error_type = err.error_type(),
                    error = %err,
                    "Listing load failed"
                );
                LoadOutcome::Failed(err)
            }
        }
    }
}
