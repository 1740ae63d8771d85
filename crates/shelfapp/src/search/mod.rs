//! # External Search
//!
//! Global search is delegated to a [`SearchBackend`]. The [`SearchSession`]
//! owns everything around the call: the current query and search type, the
//! mapped [`SearchResults`], an in-flight counter and the recent-search list.
//!
//! ## Overlapping requests
//!
//! Every request gets a sequence number when it is issued. When a response
//! arrives the session compares its number with the newest one issued:
//!
//! - [`StalePolicy::Discard`] (default): only the response to the newest
//!   request is applied. Older ones are dropped with a debug log.
//! - [`StalePolicy::LastWins`]: whichever response completes last is shown.
//!
//! The session is `Sync`: requests may be issued from several threads and
//! the outcome depends only on sequence numbers, not on arrival order.
//!
//! ## Failures
//!
//! A backend error never reaches the caller. It is logged at error level and
//! the results become empty. An empty or whitespace query clears the results
//! without contacting the backend.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

pub mod http;
pub mod local;
mod response;

pub use http::HttpSearchBackend;
pub use local::LocalSearchBackend;
pub use response::{SearchHit, SearchResponse, SearchResults, SearchType};

/// Default length of the recent-search list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Something that answers free-text queries.
pub trait SearchBackend {
    fn search(&self, query: &str) -> Result<SearchResponse>;
}

impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    fn search(&self, query: &str) -> Result<SearchResponse> {
        (**self).search(query)
    }
}

/// How responses to superseded requests are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    #[default]
    Discard,
    LastWins,
}

impl fmt::Display for StalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalePolicy::Discard => f.write_str("discard"),
            StalePolicy::LastWins => f.write_str("last-wins"),
        }
    }
}

impl FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" => Ok(StalePolicy::Discard),
            "last-wins" | "lastwins" => Ok(StalePolicy::LastWins),
            other => Err(format!("Unknown stale response policy: {}", other)),
        }
    }
}

/// An entry of the recent-search list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    /// Lower-cased query
    pub term: String,
    pub search_type: SearchType,
    pub count: usize,
}

/// Handle for one issued request. Completing it consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Default)]
struct SessionState {
    query: String,
    search_type: SearchType,
    results: SearchResults,
    applied_seq: u64,
    recent: Vec<RecentSearch>,
}

/// Query state and results of the global search page.
pub struct SearchSession<B: SearchBackend> {
    backend: B,
    policy: StalePolicy,
    recent_limit: usize,
    issued: AtomicU64,
    in_flight: AtomicUsize,
    state: Mutex<SessionState>,
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: StalePolicy::default(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn with_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Seed the recent list, e.g. from a previous run. Newest first.
    pub fn with_recent(self, recent: Vec<RecentSearch>) -> Self {
        {
            let mut state = self.lock();
            state.recent = recent;
            state.recent.truncate(self.recent_limit);
        }
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a query to completion and return the results now shown.
    pub fn search(&self, query: &str) -> SearchResults {
        if query.trim().is_empty() {
            self.clear();
            return SearchResults::default();
        }
        let ticket = self.begin(query);
        let response = self.backend.search(query);
        self.complete(ticket, response);
        self.results()
    }

    /// Issue a request without running it.
    pub fn begin(&self, query: &str) -> SearchTicket {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        log::debug!("search #{} issued: {:?}", seq, query);
        SearchTicket {
            seq,
            query: query.to_string(),
        }
    }

    /// Deliver the backend's answer for `ticket`.
    ///
    /// Returns true if the response was applied to the shown results. The
    /// shown query follows the applied response.
    pub fn complete(&self, ticket: SearchTicket, response: Result<SearchResponse>) -> bool {
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        let mut state = self.lock();

        let newest = self.issued.load(Ordering::SeqCst);
        let stale = ticket.seq != newest;
        if stale && self.policy == StalePolicy::Discard {
            log::debug!(
                "search #{} discarded, #{} is newer",
                ticket.seq,
                newest
            );
            return false;
        }

        match response {
            Ok(response) => {
                let results = SearchResults::from_response(&response);
                let search_type = state.search_type;
                record_recent(
                    &mut state.recent,
                    &ticket.query,
                    search_type,
                    results.total(),
                    self.recent_limit,
                );
                state.results = results;
            }
            Err(e) => {
                log::error!("search for {:?} failed: {}", ticket.query, e);
                state.results = SearchResults::default();
            }
        }
        state.applied_seq = ticket.seq;
        state.query = ticket.query;
        true
    }

    /// Clear query and results. Responses still in flight become stale.
    pub fn clear(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        state.query.clear();
        state.results = SearchResults::default();
    }

    pub fn set_search_type(&self, search_type: SearchType) {
        self.lock().search_type = search_type;
    }

    pub fn search_type(&self) -> SearchType {
        self.lock().search_type
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn results(&self) -> SearchResults {
        self.lock().results.clone()
    }

    /// Results narrowed to the current search type.
    pub fn visible_hits(&self) -> Vec<SearchHit> {
        let state = self.lock();
        state
            .results
            .narrowed(state.search_type)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn recent(&self) -> Vec<RecentSearch> {
        self.lock().recent.clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight() > 0
    }

    /// Sequence number of the response currently shown (0 if none).
    pub fn applied_seq(&self) -> u64 {
        self.lock().applied_seq
    }
}

fn record_recent(
    recent: &mut Vec<RecentSearch>,
    query: &str,
    search_type: SearchType,
    count: usize,
    limit: usize,
) {
    let term = query.trim().to_lowercase();
    if recent.iter().any(|r| r.term == term) {
        return;
    }
    recent.insert(
        0,
        RecentSearch {
            term,
            search_type,
            count,
        },
    );
    recent.truncate(limit);
}
