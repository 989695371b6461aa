use crate::mvi::Reducer;

use super::intent::{ListingIntent, LoadMode};
use super::state::{ListingState, ListingStatus};

pub struct ListingReducer;

impl Reducer for ListingReducer {
    type State = ListingState;
    type Intent = ListingIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            ListingIntent::Begin { mode, query } => {
                match mode {
                    LoadMode::FirstPage => {
                        state.items.clear();
                        state.status = ListingStatus::Loading;
                        state.last_query = query;
                    }
                    LoadMode::Refresh => {
                        state.status = ListingStatus::Loading;
                        state.last_query = query;
                    }
                    LoadMode::More => {
                        state.status = ListingStatus::LoadingMore;
                    }
                }
                state
            }
            ListingIntent::Loaded {
                mode,
                page,
                requested,
            } => {
                match mode {
                    LoadMode::FirstPage | LoadMode::Refresh => {
                        state.items = page.items;
                        state.current_page = 1;
                    }
                    LoadMode::More => {
                        state.items.extend(page.items);
                        // Never move backwards if upstream echoes an older page number.
                        state.current_page = page.page_number.max(requested);
                    }
                }
                // Upstream reports 0 pages for empty results.
                state.total_pages = page.total_pages.max(1);
                state.status = status_for(state.current_page, state.total_pages);
                state.last_error = None;
                state
            }
            ListingIntent::Failed {
                mode,
                message,
                restore,
            } => {
                if mode != LoadMode::More {
                    if let Some(prior) = restore {
                        state.items = prior.items;
                        state.current_page = prior.current_page;
                        state.total_pages = prior.total_pages;
                        state.last_query = prior.query;
                    }
                }
                state.status = ListingStatus::Error;
                state.last_error = Some(message);
                state
            }
            ListingIntent::Reset => ListingState::default(),
            ListingIntent::Restore(cached) => {
                if !state.items.is_empty() || state.status != ListingStatus::Idle {
                    return state;
                }
                let total_pages = cached.total_pages.max(1);
                let current_page = cached.current_page.min(total_pages);
                ListingState {
                    items: cached.items,
                    current_page,
                    total_pages,
                    status: status_for(current_page, total_pages),
                    last_query: cached.query,
                    last_error: None,
                }
            }
        }
    }
}

fn status_for(current_page: u32, total_pages: u32) -> ListingStatus {
    if current_page < total_pages {
        ListingStatus::Idle
    } else {
        ListingStatus::Exhausted
    }
}
