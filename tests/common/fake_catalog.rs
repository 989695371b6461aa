//! In-process `CatalogSource` with scripted and gated modes.
//!
//! Scripted: every call answers immediately from a response table.
//! Gated: every listing call parks until the test takes it with
//! [`FakeCatalog::next_call`] and answers it, which lets tests pick the
//! completion order of concurrent requests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use cinefeed::catalog::{CatalogError, CatalogSource, Movie, MovieDetail, Page};

/// A recorded catalog request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    Popular(u32),
    Search(String, u32),
    Details(u64),
    Similar(u64, u32),
}

/// A parked request waiting for the test to answer it.
pub struct PendingCall {
    pub call: Call,
    respond_to: oneshot::Sender<Result<Page, CatalogError>>,
}

impl PendingCall {
    pub fn respond(self, result: Result<Page, CatalogError>) {
        let _ = self.respond_to.send(result);
    }
}

pub struct FakeCatalog {
    calls: Mutex<Vec<Call>>,
    pages: Mutex<HashMap<Call, Result<Page, CatalogError>>>,
    details: Mutex<HashMap<u64, Result<MovieDetail, CatalogError>>>,
    gated: AtomicBool,
    pending_tx: mpsc::UnboundedSender<PendingCall>,
    pending_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<PendingCall>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        let (pending_tx, pending_rx) = mpsc::unbounded_channel();
        Self {
            calls: Mutex::new(Vec::new()),
            pages: Mutex::new(HashMap::new()),
            details: Mutex::new(HashMap::new()),
            gated: AtomicBool::new(false),
            pending_tx,
            pending_rx: tokio::sync::Mutex::new(pending_rx),
        }
    }

    /// Catalog whose listing calls all wait for [`next_call`](Self::next_call).
    pub fn gated() -> Self {
        let fake = Self::new();
        fake.gated.store(true, Ordering::SeqCst);
        fake
    }

    pub fn script(&self, call: Call, result: Result<Page, CatalogError>) {
        self.pages.lock().insert(call, result);
    }

    pub fn script_details(&self, id: u64, result: Result<MovieDetail, CatalogError>) {
        self.details.lock().insert(id, result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Next parked request. Panics if none arrives within five seconds.
    pub async fn next_call(&self) -> PendingCall {
        let mut rx = self.pending_rx.lock().await;
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a catalog call")
            .expect("pending channel closed")
    }

    async fn answer(&self, call: Call) -> Result<Page, CatalogError> {
        self.calls.lock().push(call.clone());
        if self.gated.load(Ordering::SeqCst) {
            let (tx, rx) = oneshot::channel();
            let _ = self.pending_tx.send(PendingCall {
                call,
                respond_to: tx,
            });
            return rx
                .await
                .unwrap_or_else(|_| Err(CatalogError::network("gate dropped")));
        }
        self.pages
            .lock()
            .get(&call)
            .cloned()
            .unwrap_or_else(|| Err(CatalogError::upstream(404, format!("unscripted {:?}", call))))
    }
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_popular(&self, page: u32) -> Result<Page, CatalogError> {
        self.answer(Call::Popular(page)).await
    }

    async fn search_by_title(&self, query: &str, page: u32) -> Result<Page, CatalogError> {
        self.answer(Call::Search(query.to_string(), page)).await
    }

    async fn fetch_details(&self, id: u64) -> Result<MovieDetail, CatalogError> {
        self.calls.lock().push(Call::Details(id));
        self.details
            .lock()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(CatalogError::upstream(404, "not found")))
    }

    async fn fetch_similar(&self, id: u64, page: u32) -> Result<Page, CatalogError> {
        let call = Call::Similar(id, page);
        self.calls.lock().push(call.clone());
        self.pages
            .lock()
            .get(&call)
            .cloned()
            .unwrap_or_else(|| Err(CatalogError::upstream(404, "not found")))
    }
}

/// Movies with ids `start..start + count`, titled "Movie {id}".
pub fn movies(start: u64, count: u64) -> Vec<Movie> {
    (start..start + count)
        .map(|id| Movie::new(id, format!("Movie {}", id)))
        .collect()
}

/// Page `number` of `total`, holding twenty movies numbered by page.
pub fn popular_page(number: u32, total: u32) -> Page {
    let start = (number as u64 - 1) * 20 + 1;
    Page::new(movies(start, 20), number, total)
}

/// Single-page result whose movies are all titled after `query`.
pub fn search_page(query: &str, first_id: u64, count: u64) -> Page {
    let items = (first_id..first_id + count)
        .map(|id| Movie::new(id, format!("{} {}", query, id)))
        .collect();
    Page::new(items, 1, 1)
}
