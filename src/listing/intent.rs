use crate::catalog::Page;
use crate::mvi::Intent;

use super::cache::CachedListing;
use super::state::PageSet;

/// How a load was started; decides what happens to visible items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Discard items immediately, replace on success.
    FirstPage,
    /// Keep items visible until the new first page arrives.
    Refresh,
    /// Append the next page.
    More,
}

#[derive(Debug, Clone)]
pub enum ListingIntent {
    Begin {
        mode: LoadMode,
        /// Query for first-page/refresh loads; ignored for `More`.
        query: Option<String>,
    },
    Loaded {
        mode: LoadMode,
        page: Page,
        /// Page number that was asked for.
        requested: u32,
    },
    Failed {
        mode: LoadMode,
        message: String,
        /// Prior data to put back (first-page and refresh failures only).
        restore: Option<PageSet>,
    },
    Reset,
    /// Seed from the on-disk cache. Ignored unless the listing is empty and idle.
    Restore(CachedListing),
}

impl Intent for ListingIntent {}
