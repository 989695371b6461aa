//! Application session.
//!
//! One [`Session`] is built at startup and shared by reference. It owns the
//! catalog client, both listings, the search sequencer, favorites and
//! ratings, and exposes the user intents and render views on top of them.

mod detail;

pub use detail::DetailView;

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::catalog::{image_url, CatalogError, CatalogSource, Movie, TmdbClient};
use crate::config::Config;
use crate::favorites::FavoritesStore;
use crate::listing::{ListingCache, ListingKind, ListingMachine, ListingStatus, LoadOutcome};
use crate::ratings::{RatingError, RatingsStore};
use crate::search::SearchSequencer;
use crate::storage::{FileStore, KeyValueStore, SnapshotWriter};

/// One listing row with its favorite flag resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub movie: Movie,
    pub is_favorite: bool,
}

/// What the presentation layer renders for the active listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    pub kind: ListingKind,
    pub status: ListingStatus,
    pub current_page: u32,
    pub total_pages: u32,
    pub query: Option<String>,
    pub last_error: Option<String>,
    pub rows: Vec<MovieRow>,
}

pub struct Session {
    config: Config,
    catalog: Arc<dyn CatalogSource>,
    listings: Arc<ListingMachine>,
    search: SearchSequencer,
    favorites: Arc<FavoritesStore>,
    ratings: Arc<RatingsStore>,
    writer: SnapshotWriter,
}

impl Session {
    /// Build a session backed by the TMDB client and the on-disk store.
    pub fn open(config: Config) -> Result<Self, CatalogError> {
        let catalog = Arc::new(TmdbClient::new(&config.api)?);
        let dir = config.storage.resolved_data_dir();
        tracing::info!(data_dir = %dir.display(), "Opening session");
        let store = Arc::new(FileStore::new(dir));
        Ok(Self::with_parts(config, catalog, store))
    }

    /// Build a session from explicit parts.
    pub fn with_parts(
        config: Config,
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let writer = SnapshotWriter::spawn(Arc::clone(&store));
        let favorites = Arc::new(FavoritesStore::load(store.as_ref(), writer.clone()));
        let ratings = Arc::new(RatingsStore::new(Arc::clone(&store), writer.clone()));

        let mut machine = ListingMachine::new(Arc::clone(&catalog));
        if config.storage.cache_listings {
            machine = machine.with_cache(ListingCache::new(Arc::clone(&store), writer.clone()));
        }
        let listings = Arc::new(machine);
        if config.storage.cache_listings {
            for &kind in ListingKind::all() {
                listings.restore_cached(kind);
            }
        }

        let search = SearchSequencer::new(Arc::clone(&listings), &config.search);

        Self {
            config,
            catalog,
            listings,
            search,
            favorites,
            ratings,
            writer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn listings(&self) -> &Arc<ListingMachine> {
        &self.listings
    }

    pub fn search(&self) -> &SearchSequencer {
        &self.search
    }

    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.favorites
    }

    pub fn ratings(&self) -> &Arc<RatingsStore> {
        &self.ratings
    }

    // -- Intents --------------------------------------------------------------

    /// Initial browse load.
    pub async fn start(&self) -> LoadOutcome {
        self.listings.load_first_page(ListingKind::Browse, None).await
    }

    pub fn on_search_text_changed(&self, text: &str) {
        self.search.on_text_changed(text);
    }

    /// Search immediately, skipping the debounce window.
    pub fn on_search_submitted(&self, text: &str) -> Option<JoinHandle<LoadOutcome>> {
        self.search.submit(text)
    }

    /// Load the next page of whichever listing is on screen.
    pub async fn on_scroll_near_end(&self) -> LoadOutcome {
        self.listings.load_more(self.active_kind()).await
    }

    pub async fn on_pull_to_refresh(&self) -> LoadOutcome {
        let kind = self.active_kind();
        self.listings.refresh(kind, None).await
    }

    /// Returns whether `movie` is favorited afterwards.
    pub fn on_favorite_tapped(&self, movie: &Movie) -> bool {
        self.favorites.toggle(movie)
    }

    /// Tap on star `value` for movie `id`; tapping the current rating
    /// clears it. Returns the rating afterwards.
    pub fn on_rating_tapped(&self, id: u64, value: u8) -> Result<u8, RatingError> {
        self.ratings.rate(id, value)
    }

    /// Details plus similar movies for `id`.
    pub async fn open_detail(&self, id: u64) -> Result<DetailView, CatalogError> {
        let (detail, similar) = detail::load_detail(self.catalog.as_ref(), id).await?;
        let is_favorite = self.favorites.contains(detail.movie.id);
        let user_rating = self.ratings.get(detail.movie.id);
        Ok(DetailView {
            detail,
            similar,
            is_favorite,
            user_rating,
        })
    }

    // -- Views ----------------------------------------------------------------

    pub fn active_kind(&self) -> ListingKind {
        self.search.active_kind()
    }

    /// The active listing with favorite flags applied.
    pub fn visible(&self) -> ListingView {
        self.view(self.active_kind())
    }

    pub fn view(&self, kind: ListingKind) -> ListingView {
        let state = self.listings.snapshot(kind);
        let favorites = self.favorites.snapshot();
        let rows = state
            .items
            .into_iter()
            .map(|movie| MovieRow {
                is_favorite: favorites.contains(movie.id),
                movie,
            })
            .collect();

        ListingView {
            kind,
            status: state.status,
            current_page: state.current_page,
            total_pages: state.total_pages,
            query: state.last_query,
            last_error: state.last_error,
            rows,
        }
    }

    /// Favorites in insertion order, all flagged.
    pub fn favorites_view(&self) -> Vec<MovieRow> {
        self.favorites
            .list()
            .into_iter()
            .map(|movie| MovieRow {
                movie,
                is_favorite: true,
            })
            .collect()
    }

    /// Poster URL for `movie` at `size` (e.g. "w342").
    pub fn poster_url(&self, movie: &Movie, size: &str) -> Option<String> {
        image_url(&self.config.api.image_base_url, size, movie.poster_path.as_deref())
    }

    /// Drop pending debounce timers and wait for queued writes.
    pub async fn shutdown(&self) {
        self.search.cancel_pending();
        self.writer.flush().await;
        tracing::info!("Session closed");
    }
}
