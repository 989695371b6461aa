//! Client-side cache and sync layer for a movie browser.
//!
//! Fetches a paginated popular catalog and title search from a TMDB-style
//! API, keeps locally persisted favorites and star ratings, and turns
//! keystrokes into debounced searches.

pub mod catalog;
pub mod config;
pub mod favorites;
pub mod listing;
pub mod logging;
pub mod mvi;
pub mod ratings;
pub mod search;
pub mod session;
pub mod storage;
