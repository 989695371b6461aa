//! Local persistence adapter.
//!
//! A string key-value capability ([`KeyValueStore`]) with a file-backed and
//! an in-memory implementation, plus [`SnapshotWriter`] for fire-and-forget
//! writes off the caller's thread.

mod error;
mod file;
mod memory;
mod writer;

pub use error::PersistenceError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use writer::SnapshotWriter;

/// Key holding the favorites snapshot.
pub const FAVORITES_KEY: &str = "favorites";
/// Key holding the cached browse listing.
pub const CACHED_POPULAR_KEY: &str = "cached_popular_movies";
/// Key holding the cached search listing.
pub const CACHED_SEARCH_KEY: &str = "cached_search_movies";

/// Key holding the user's star rating for movie `id`.
pub fn rating_key(id: u64) -> String {
    format!("movie_rating_{}", id)
}

/// Durable string store.
///
/// `read` never fails: a missing, unreadable or corrupt entry is `None`.
/// `write` reports failures so the caller can log them; nobody retries.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
