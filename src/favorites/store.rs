//! Shared favorites projection.
//!
//! Readers take an `Arc` snapshot; writers clone-on-write under the lock,
//! so a renderer iterating a snapshot never sees a half-applied toggle.
//! Each mutation queues the full list to the snapshot writer.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::Movie;
use crate::storage::{KeyValueStore, SnapshotWriter, FAVORITES_KEY};

use super::set::FavoritesSet;

pub struct FavoritesStore {
    current: RwLock<Arc<FavoritesSet>>,
    writer: Option<SnapshotWriter>,
}

impl FavoritesStore {
    /// Seed from the persisted snapshot in `store`. A missing or corrupt
    /// snapshot yields an empty set; startup never fails here.
    pub fn load(store: &dyn KeyValueStore, writer: SnapshotWriter) -> Self {
        let set = match store.read(FAVORITES_KEY) {
            None => FavoritesSet::new(),
            Some(raw) => match serde_json::from_str::<Vec<Movie>>(&raw) {
                Ok(items) => FavoritesSet::from_items(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Corrupt favorites snapshot, starting empty");
                    FavoritesSet::new()
                }
            },
        };
        tracing::debug!(count = set.len(), "Favorites loaded");

        Self {
            current: RwLock::new(Arc::new(set)),
            writer: Some(writer),
        }
    }

    /// Store with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            current: RwLock::new(Arc::new(FavoritesSet::new())),
            writer: None,
        }
    }

    /// Flip membership of `movie`. Returns whether it is favorited afterwards.
    pub fn toggle(&self, movie: &Movie) -> bool {
        let favorited = self.mutate(|set| {
            let favorited = set.toggle(movie.clone());
            (favorited, true)
        });
        tracing::info!(movie_id = movie.id, favorited, "Favorite toggled");
        favorited
    }

    /// Insert `movie` if absent. Returns whether the set changed.
    pub fn add(&self, movie: &Movie) -> bool {
        self.mutate(|set| {
            let changed = set.insert(movie.clone());
            (changed, changed)
        })
    }

    /// Remove `id` if present. Returns whether the set changed.
    pub fn remove(&self, id: u64) -> bool {
        self.mutate(|set| {
            let changed = set.remove(id).is_some();
            (changed, changed)
        })
    }

    pub fn contains(&self, id: u64) -> bool {
        self.current.read().contains(id)
    }

    /// Favorites in insertion order.
    pub fn list(&self) -> Vec<Movie> {
        self.current.read().items().to_vec()
    }

    /// Immutable view; cheap to take and safe to hold across mutations.
    pub fn snapshot(&self) -> Arc<FavoritesSet> {
        Arc::clone(&self.current.read())
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    /// Wait for queued snapshot writes to land.
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    /// Apply `f` under the write lock. `f` returns its result and whether
    /// the set changed. Changed sets are queued to the writer before the
    /// lock is released, so queued snapshots follow mutation order.
    fn mutate<T>(&self, f: impl FnOnce(&mut FavoritesSet) -> (T, bool)) -> T {
        let mut guard = self.current.write();
        let (result, changed) = f(Arc::make_mut(&mut *guard));
        if changed {
            if let Some(writer) = &self.writer {
                writer.put_json(FAVORITES_KEY, guard.items());
            }
        }
        result
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
