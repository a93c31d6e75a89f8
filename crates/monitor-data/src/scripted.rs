//! In-memory fetcher that replays scripted responses.
//!
//! Used by tests and by the binary's `--offline` mode. Each URL owns a queue
//! of responses; every fetch consumes the front entry, except that the final
//! entry is repeated forever once it is the only one left.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use super::fetcher::{FetchError, Fetcher};

#[derive(Debug, Clone)]
enum Response {
    Content(String),
    Failure(String),
}

/// Replays canned page contents per URL.
///
/// # Example
///
/// ```
/// use monitor_data::fetcher::Fetcher;
/// use monitor_data::scripted::ScriptedFetcher;
///
/// let fetcher = ScriptedFetcher::new()
///     .respond("https://example.com", "v1")
///     .respond("https://example.com", "v2");
///
/// assert_eq!(fetcher.fetch("https://example.com").unwrap(), "v1");
/// assert_eq!(fetcher.fetch("https://example.com").unwrap(), "v2");
/// assert_eq!(fetcher.fetch("https://example.com").unwrap(), "v2");
/// ```
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Response>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for `url`.
    pub fn respond(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(url.into(), Response::Content(content.into()))
    }

    /// Queue a failed fetch for `url`.
    pub fn fail(self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.push(url.into(), Response::Failure(reason.into()))
    }

    fn push(self, url: String, response: Response) -> Self {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(url)
            .or_default()
            .push_back(response);
        self
    }

    /// Number of responses still queued for `url`.
    pub fn remaining(&self, url: &str) -> usize {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .map_or(0, VecDeque::len)
    }
}

impl Fetcher for ScriptedFetcher {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let unavailable = |reason: &str| FetchError::Unavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);

        let queue = scripts
            .get_mut(url)
            .ok_or_else(|| unavailable("no scripted response"))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match response {
            Some(Response::Content(content)) => Ok(content),
            Some(Response::Failure(reason)) => Err(unavailable(&reason)),
            None => Err(unavailable("no scripted response")),
        }
    }
}
