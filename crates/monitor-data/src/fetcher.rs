//! The fetch collaborator.

use thiserror::Error;

/// Why a resource could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The resource is not available from this fetcher.
    #[error("{url} unavailable: {reason}")]
    Unavailable { url: String, reason: String },
}

impl FetchError {
    /// URL of the resource that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::Unavailable { url, .. } => url,
        }
    }
}

/// Retrieves the current content of a resource.
///
/// The change detector calls [`fetch`](Fetcher::fetch) once per check and
/// treats any error as "skip this check".
pub trait Fetcher: Send {
    /// Short label used in log records.
    fn name(&self) -> &str;

    /// Fetch the current content at `url`.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "https://example.com returned HTTP 503");
        assert_eq!(err.url(), "https://example.com");
    }

    #[test]
    fn test_unavailable_error_display() {
        let err = FetchError::Unavailable {
            url: "https://example.com".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "https://example.com unavailable: connection refused"
        );
    }
}
