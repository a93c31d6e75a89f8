use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the site monitor.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A subscription names a comparison strategy that is not registered.
    #[error("Unknown comparison strategy: {0}")]
    UnknownStrategy(String),

    /// A user could not be registered.
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    /// The watch-list file could not be read or parsed.
    #[error("Failed to load watch list {path}: {reason}")]
    WatchList { path: PathBuf, reason: String },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;
