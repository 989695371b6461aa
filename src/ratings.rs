//! Personal star ratings, one per movie.
//!
//! Each rating lives under its own key (`movie_rating_{id}`) as a plain
//! number from 0 to 5, 0 meaning unrated. Values are read lazily on first
//! use and remembered; every change is queued to the snapshot writer while
//! the lock is held, so the last value queued for a movie is the one kept.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::storage::{rating_key, KeyValueStore, SnapshotWriter};

/// Highest star value.
pub const MAX_STARS: u8 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("Rating must be between 1 and {max}, got {value}")]
    OutOfRange { value: u8, max: u8 },
}

pub struct RatingsStore {
    known: RwLock<HashMap<u64, u8>>,
    store: Option<Arc<dyn KeyValueStore>>,
    writer: Option<SnapshotWriter>,
}

impl RatingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>, writer: SnapshotWriter) -> Self {
        Self {
            known: RwLock::new(HashMap::new()),
            store: Some(store),
            writer: Some(writer),
        }
    }

    /// Store with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            known: RwLock::new(HashMap::new()),
            store: None,
            writer: None,
        }
    }

    /// Stars given to `id`, 0 when unrated.
    pub fn get(&self, id: u64) -> u8 {
        if let Some(&stars) = self.known.read().get(&id) {
            return stars;
        }
        let mut known = self.known.write();
        let stars = self.stored(id);
        *known.entry(id).or_insert(stars)
    }

    /// Apply a tap on star `value`. Tapping the current rating clears it.
    /// Returns the rating afterwards.
    pub fn rate(&self, id: u64, value: u8) -> Result<u8, RatingError> {
        if !(1..=MAX_STARS).contains(&value) {
            return Err(RatingError::OutOfRange {
                value,
                max: MAX_STARS,
            });
        }

        let mut known = self.known.write();
        let current = match known.get(&id) {
            Some(&stars) => stars,
            None => self.stored(id),
        };
        let next = if current == value { 0 } else { value };
        known.insert(id, next);
        if let Some(writer) = &self.writer {
            writer.put(&rating_key(id), next.to_string());
        }
        drop(known);

        tracing::info!(movie_id = id, stars = next, "Rating set");
        Ok(next)
    }

    /// Wait for queued rating writes to land.
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    fn stored(&self, id: u64) -> u8 {
        let Some(raw) = self.store.as_ref().and_then(|s| s.read(&rating_key(id))) else {
            return 0;
        };
        match raw.trim().parse::<u8>() {
            Ok(stars) if stars <= MAX_STARS => stars,
            _ => {
                tracing::warn!(movie_id = id, raw = %raw, "Ignoring unreadable rating");
                0
            }
        }
    }
}

impl Default for RatingsStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
