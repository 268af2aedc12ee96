//! Detail popup cache
//!
//! Each movie's detail popup is fetched at most once and reused by every
//! decoder that reads from it (synopsis, poster, still cuts). The cache is an
//! explicit object owned by the caller; there is no process-global state.

mod document;

pub use document::DetailDocument;

use crate::transport::{Endpoint, FormFields, Transport};
use crate::Result;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// Memoizes detail popups by movie code
///
/// Population is serialized: one lock guards the whole cache and is held
/// across the fetch, so two callers asking for the same code never both hit
/// the network. Fetches for different codes also run one at a time, and
/// `contains`, `len` and `clear` wait for an in-flight fetch to finish. A
/// failed fetch stores nothing.
#[derive(Debug)]
pub struct DetailCache {
    transport: Transport,
    state: Mutex<CacheState>,
}

impl DetailCache {
    /// Creates an unbounded cache
    pub fn new(transport: Transport) -> Self {
        Self::bounded(transport, 0)
    }

    /// Creates a cache holding at most `max_entries` popups
    ///
    /// `0` means unbounded. When full, the oldest inserted popup is evicted.
    pub fn bounded(transport: Transport, max_entries: usize) -> Self {
        Self {
            transport,
            state: Mutex::new(CacheState::new(max_entries)),
        }
    }

    /// Transport used to fetch popups
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the popup for `code`, fetching it on a miss
    pub async fn get(&self, code: u32) -> Result<DetailDocument> {
        let mut state = self.state.lock().await;

        if let Some(document) = state.get(code) {
            tracing::debug!("Detail cache hit for movie {}", code);
            return Ok(document);
        }

        tracing::debug!("Detail cache miss for movie {}, fetching popup", code);
        let body = self
            .transport
            .post(Endpoint::MovieDetail, &FormFields::movie_detail(code))
            .await?;

        let document = DetailDocument::new(code, body);
        if let Some(evicted) = state.insert(document.clone()) {
            tracing::debug!("Evicted movie {} from detail cache", evicted);
        }
        Ok(document)
    }

    /// Evicts every cached popup
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        tracing::debug!("Clearing {} cached detail popups", state.len());
        state.clear();
    }

    /// Whether a popup for `code` is cached
    pub async fn contains(&self, code: u32) -> bool {
        self.state.lock().await.get(code).is_some()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Stored popups plus their insertion order
#[derive(Debug)]
struct CacheState {
    documents: HashMap<u32, DetailDocument>,
    order: VecDeque<u32>,
    max_entries: usize,
}

impl CacheState {
    fn new(max_entries: usize) -> Self {
        Self {
            documents: HashMap::new(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    fn get(&self, code: u32) -> Option<DetailDocument> {
        self.documents.get(&code).cloned()
    }

    /// Stores a popup, returning the code evicted to make room, if any
    fn insert(&mut self, document: DetailDocument) -> Option<u32> {
        let code = document.code();
        if self.documents.insert(code, document).is_some() {
            return None;
        }
        self.order.push_back(code);

        if self.max_entries > 0 && self.order.len() > self.max_entries {
            let oldest = self.order.pop_front()?;
            self.documents.remove(&oldest);
            return Some(oldest);
        }
        None
    }

    fn clear(&mut self) {
        self.documents.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}
