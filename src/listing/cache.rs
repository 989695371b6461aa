//! On-disk cache of the last good listing pages.
//!
//! Lets a cold start render the previous session's browse/search results
//! before the first network round-trip completes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Movie;
use crate::storage::{KeyValueStore, SnapshotWriter, CACHED_POPULAR_KEY, CACHED_SEARCH_KEY};

use super::state::{ListingKind, ListingState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedListing {
    pub kind: ListingKind,
    #[serde(default)]
    pub query: Option<String>,
    pub items: Vec<Movie>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl CachedListing {
    pub fn from_state(kind: ListingKind, state: &ListingState) -> Self {
        Self {
            kind,
            query: state.last_query.clone(),
            items: state.items.clone(),
            current_page: state.current_page,
            total_pages: state.total_pages,
        }
    }
}

pub struct ListingCache {
    store: Arc<dyn KeyValueStore>,
    writer: SnapshotWriter,
}

impl ListingCache {
    pub fn new(store: Arc<dyn KeyValueStore>, writer: SnapshotWriter) -> Self {
        Self { store, writer }
    }

    pub fn key(kind: ListingKind) -> &'static str {
        match kind {
            ListingKind::Browse => CACHED_POPULAR_KEY,
            ListingKind::Search => CACHED_SEARCH_KEY,
        }
    }

    pub fn save(&self, entry: &CachedListing) {
        self.writer.put_json(Self::key(entry.kind), entry);
    }

    pub fn clear(&self, kind: ListingKind) {
        self.writer.remove(Self::key(kind));
    }

    /// Read the cached listing for `kind`. Corrupt or mismatched entries
    /// are treated as absent.
    pub fn load(&self, kind: ListingKind) -> Option<CachedListing> {
        let raw = self.store.read(Self::key(kind))?;
        match serde_json::from_str::<CachedListing>(&raw) {
            Ok(entry) if entry.kind == kind && entry.current_page > 0 => Some(entry),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Ignoring corrupt listing cache");
                None
            }
        }
    }
}
