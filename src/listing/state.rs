use serde::{Deserialize, Serialize};

use crate::catalog::Movie;
use crate::mvi::ViewState;

/// Which of the two independent listings an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Browse,
    Search,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Search => "search",
        }
    }

    pub fn all() -> &'static [ListingKind] {
        &[Self::Browse, Self::Search]
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Browse => 0,
            Self::Search => 1,
        }
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingStatus {
    #[default]
    Idle,
    Loading,
    LoadingMore,
    Error,
    Exhausted,
}

impl ListingStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading | Self::LoadingMore)
    }
}

/// Renderable state of one listing.
///
/// A listing that never loaded anything has `current_page == 0` and
/// `total_pages == 0`. Items are insertion-ordered and not deduplicated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingState {
    pub items: Vec<Movie>,
    pub current_page: u32,
    pub total_pages: u32,
    pub status: ListingStatus,
    /// Query the items belong to. Always `None` for browse.
    pub last_query: Option<String>,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

impl ViewState for ListingState {}

impl ListingState {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether `load_more` may dispatch a request right now.
    pub fn can_load_more(&self) -> bool {
        !matches!(
            self.status,
            ListingStatus::Loading | ListingStatus::LoadingMore | ListingStatus::Exhausted
        ) && self.has_more()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The data portion of this state, if anything was ever loaded.
    pub(crate) fn page_set(&self) -> Option<PageSet> {
        if self.current_page == 0 {
            return None;
        }
        Some(PageSet {
            items: self.items.clone(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            query: self.last_query.clone(),
        })
    }
}

/// Items plus pagination, used to roll a listing back after a failed
/// first-page load or refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSet {
    pub items: Vec<Movie>,
    pub current_page: u32,
    pub total_pages: u32,
    pub query: Option<String>,
}
