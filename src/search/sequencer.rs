//! Keystroke-to-search debouncing.
//!
//! Every keystroke bumps a ticket and restarts a timer. When a timer fires
//! with the latest ticket, the trimmed text decides what happens:
//!
//! - at least `min_query_chars`: a first-page search is dispatched
//! - empty: the search listing is reset
//! - anything in between: nothing
//!
//! A dispatch takes the listing's sequencing token synchronously, then runs
//! the request in its own task. Aborting a timer can therefore never
//! interrupt a load mid-flight, and a later dispatch always supersedes an
//! earlier one.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::listing::{select_active_with, ListingKind, ListingMachine, LoadMode, LoadOutcome};

#[derive(Default)]
struct PendingState {
    pending_text: String,
    last_dispatched: Option<String>,
    /// Bumped on every dispatched search.
    generation: u64,
    /// Bumped on every keystroke; only the latest ticket may fire.
    ticket: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    machine: Arc<ListingMachine>,
    debounce: Duration,
    min_chars: usize,
    state: Mutex<PendingState>,
}

/// Turns raw input text into at most one search per quiet period.
#[derive(Clone)]
pub struct SearchSequencer {
    inner: Arc<Inner>,
}

impl SearchSequencer {
    pub fn new(machine: Arc<ListingMachine>, config: &SearchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                machine,
                debounce: Duration::from_millis(config.debounce_ms),
                min_chars: config.min_query_chars.max(1),
                state: Mutex::new(PendingState::default()),
            }),
        }
    }

    /// Record new input text and restart the debounce window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_text_changed(&self, text: &str) {
        let mut state = self.inner.state.lock();
        state.pending_text = text.to_string();
        state.ticket += 1;
        let ticket = state.ticket;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let this = self.clone();
        let debounce = self.inner.debounce;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Aborting this timer from here on only detaches the dispatch.
            if let Some(dispatch) = this.fire(ticket) {
                match dispatch.await {
                    Ok(outcome) => tracing::trace!(ticket, outcome = ?outcome, "Debounced search finished"),
                    Err(e) => tracing::warn!(ticket, error = %e, "Debounced search task failed"),
                }
            }
        }));
        tracing::trace!(ticket, len = text.len(), "Search text changed");
    }

    /// Bypass the debounce window and act on `text` now.
    ///
    /// Returns the dispatched load, if the text was long enough to search.
    pub fn submit(&self, text: &str) -> Option<JoinHandle<LoadOutcome>> {
        let ticket = {
            let mut state = self.inner.state.lock();
            state.pending_text = text.to_string();
            state.ticket += 1;
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.ticket
        };
        self.fire(ticket)
    }

    /// Abort the pending timer, if any. In-flight requests are unaffected.
    pub fn cancel_pending(&self) {
        let mut state = self.inner.state.lock();
        state.ticket += 1;
        if let Some(timer) = state.timer.take() {
            timer.abort();
            tracing::trace!("Pending search cancelled");
        }
    }

    /// Latest text seen, dispatched or not.
    pub fn pending_text(&self) -> String {
        self.inner.state.lock().pending_text.clone()
    }

    /// Query of the most recent dispatched search. Cleared on reset.
    pub fn last_dispatched_query(&self) -> Option<String> {
        self.inner.state.lock().last_dispatched.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    /// Listing that should be on screen for the current input text.
    pub fn active_kind(&self) -> ListingKind {
        select_active_with(&self.inner.state.lock().pending_text, self.inner.min_chars)
    }

    fn fire(&self, ticket: u64) -> Option<JoinHandle<LoadOutcome>> {
        let mut state = self.inner.state.lock();
        if state.ticket != ticket {
            return None;
        }
        state.timer = None;

        let query = state.pending_text.trim().to_string();
        let chars = query.chars().count();
        if chars == 0 {
            state.last_dispatched = None;
            self.inner.machine.reset(ListingKind::Search);
            tracing::debug!("Search cleared");
            return None;
        }
        if chars < self.inner.min_chars {
            tracing::trace!(chars, "Query too short, not searching");
            return None;
        }

        // The listing token is taken here, under our lock, so dispatch
        // order decides which response wins regardless of task scheduling.
        let pending = self
            .inner
            .machine
            .begin(ListingKind::Search, Some(&query), LoadMode::FirstPage)?;
        state.generation += 1;
        state.last_dispatched = Some(query.clone());
        tracing::debug!(query = %query, generation = state.generation, "Dispatching search");
        drop(state);

        let machine = Arc::clone(&self.inner.machine);
        Some(tokio::spawn(async move { machine.run(pending).await }))
    }
}
