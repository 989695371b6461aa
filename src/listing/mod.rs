//! Pagination state machine for the browse and search listings.

mod cache;
mod intent;
mod machine;
mod reducer;
mod state;

pub use cache::{CachedListing, ListingCache};
pub use intent::{ListingIntent, LoadMode};
pub use machine::{ListingMachine, LoadOutcome};
pub use reducer::ListingReducer;
pub use state::{ListingKind, ListingState, ListingStatus, PageSet};

/// Minimum trimmed query length that makes the search listing visible.
pub const MIN_QUERY_CHARS: usize = 2;

/// Which listing should be on screen for the current input text.
pub fn select_active(query: &str) -> ListingKind {
    select_active_with(query, MIN_QUERY_CHARS)
}

/// [`select_active`] with a configurable threshold.
pub fn select_active_with(query: &str, min_chars: usize) -> ListingKind {
    if query.trim().chars().count() >= min_chars {
        ListingKind::Search
    } else {
        ListingKind::Browse
    }
}
