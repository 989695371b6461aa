//! Capability trait for the remote movie catalog.

use async_trait::async_trait;

use super::error::CatalogError;
use super::models::{MovieDetail, Page};

/// Remote catalog consumed by the listing machine and the session.
///
/// Implementations own transport concerns (auth, timeouts); every failure
/// is reported as a [`CatalogError`] and never retried here.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Popular movies, 1-based page.
    async fn fetch_popular(&self, page: u32) -> Result<Page, CatalogError>;

    /// Title search, 1-based page.
    async fn search_by_title(&self, query: &str, page: u32) -> Result<Page, CatalogError>;

    /// Full detail including credits. Not used by listings.
    async fn fetch_details(&self, id: u64) -> Result<MovieDetail, CatalogError>;

    /// Movies similar to `id`.
    async fn fetch_similar(&self, id: u64, page: u32) -> Result<Page, CatalogError>;
}
