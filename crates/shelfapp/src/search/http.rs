//! Semantic search over HTTP.

use super::{SearchBackend, SearchResponse};
use crate::error::{Result, ShelfError};
use std::time::Duration;

/// Calls `POST {base_url}/search/semantic?query=<q>`.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpSearchBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/search/semantic", self.base_url.trim_end_matches('/'))
    }
}

impl SearchBackend for HttpSearchBackend {
    fn search(&self, query: &str) -> Result<SearchResponse> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let mut request = agent.post(&self.endpoint()).query("query", query);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        match request.call() {
            Ok(response) => {
                let value: serde_json::Value = response
                    .into_json()
                    .map_err(|e| ShelfError::Search(format!("unreadable response: {}", e)))?;
                SearchResponse::from_value(value)
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                Err(ShelfError::Search(format!("HTTP {}: {}", code, preview)))
            }
            Err(ureq::Error::Transport(transport)) => Err(ShelfError::Search(format!(
                "cannot reach {}: {}",
                self.endpoint(),
                transport
            ))),
        }
    }
}
