//! Blocking HTTP fetcher.

use std::time::Duration;

use super::fetcher::{FetchError, Fetcher};

/// Default `User-Agent` header sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("site-monitor/", env!("CARGO_PKG_VERSION"));

/// Fetches pages with a blocking `GET`.
///
/// A client is built per request so that no blocking runtime outlives the
/// thread that performed the fetch. There is no retry; a failed request is
/// reported once and the caller decides what to do.
pub struct HttpFetcher {
    timeout: Duration,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(transport)?;

        let response = client.get(url).send().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_user_agent() {
        let fetcher = HttpFetcher::new(Duration::from_secs(3));
        assert_eq!(fetcher.timeout(), Duration::from_secs(3));
        assert!(fetcher.user_agent.starts_with("site-monitor/"));
        assert_eq!(fetcher.name(), "http");
    }

    #[test]
    fn test_with_user_agent_overrides() {
        let fetcher = HttpFetcher::new(Duration::from_secs(3)).with_user_agent("probe/1.0");
        assert_eq!(fetcher.user_agent, "probe/1.0");
    }

    #[test]
    fn test_malformed_url_is_transport_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1));
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.url(), "not a url");
    }
}
