//! Global search, with the recent-search list kept between runs in
//! `<data_dir>/recent-searches.json`.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::search::{RecentSearch, SearchBackend, SearchSession, SearchType, StalePolicy};
use std::fs;
use std::path::{Path, PathBuf};

pub const RECENT_FILE: &str = "recent-searches.json";

/// JSON file holding the recent-search list, newest first.
#[derive(Debug, Clone)]
pub struct RecentStore {
    path: PathBuf,
}

impl RecentStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(RECENT_FILE),
        }
    }

    pub fn load(&self) -> Result<Vec<RecentSearch>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&text) {
            Ok(list) => Ok(list),
            Err(e) => {
                log::warn!("ignoring unreadable {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&self, recent: &[RecentSearch]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(recent)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: SearchType,
    pub policy: StalePolicy,
    pub recent_limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_type: SearchType::All,
            policy: StalePolicy::default(),
            recent_limit: crate::search::DEFAULT_RECENT_LIMIT,
        }
    }
}

pub fn run<B: SearchBackend>(backend: B, request: &SearchRequest, store: &RecentStore) -> Result<CmdResult> {
    let session = SearchSession::new(backend)
        .with_policy(request.policy)
        .with_recent_limit(request.recent_limit)
        .with_recent(store.load()?);
    session.set_search_type(request.search_type);

    let mut result = CmdResult::default();
    let query = request.query.trim();
    if query.is_empty() {
        session.clear();
        result.add_message(CmdMessage::info("Enter a search term"));
        result.recent = session.recent();
        return Ok(result);
    }

    let ticket = session.begin(query);
    let response = session.backend().search(query);
    let failure = response.as_ref().err().map(|e| e.to_string());
    session.complete(ticket, response);

    result.hits = session.visible_hits();
    match failure {
        Some(reason) => result.add_message(CmdMessage::warning(reason)),
        None if result.hits.is_empty() => {
            result.add_message(CmdMessage::info(format!("No results for \"{}\"", query)))
        }
        None => result.add_message(CmdMessage::info(format!(
            "{} result{} for \"{}\"",
            result.hits.len(),
            if result.hits.len() == 1 { "" } else { "s" },
            query
        ))),
    }

    result.recent = session.recent();
    store.save(&result.recent)?;
    Ok(result)
}

/// The stored recent-search list.
pub fn recent(store: &RecentStore) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.recent = store.load()?;
    if result.recent.is_empty() {
        result.add_message(CmdMessage::info("No recent searches"));
    }
    Ok(result)
}
