//! On-disk description of who watches what.
//!
//! The watch list is a JSON document stored by default at
//! `~/.site-monitor/watch_list.json`:
//!
//! ```json
//! {
//!   "users": [
//!     {
//!       "username": "alice",
//!       "email": "alice@example.com",
//!       "password": "secret",
//!       "subscriptions": [
//!         { "url": "https://example.com", "frequency": "daily",
//!           "channel": "email", "strategy": "text" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Strategy keys are not validated here; an unknown key is reported when the
//! subscription is checked.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::AuthenticationService;
use crate::error::{MonitorError, Result};
use crate::models::{NotificationPreferences, User};

/// One subscription entry in the watch-list file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedSubscription {
    pub url: String,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    pub strategy: String,
}

/// One user entry in the watch-list file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub subscriptions: Vec<WatchedSubscription>,
}

/// All users and subscriptions the monitor should poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchList {
    #[serde(default)]
    pub users: Vec<WatchedUser>,
}

fn default_frequency() -> String {
    "daily".to_string()
}

fn default_channel() -> String {
    "email".to_string()
}

impl WatchList {
    /// The built-in demo: one user watching three sites, one per strategy.
    pub fn demo() -> Self {
        let subscription = |url: &str, strategy: &str| WatchedSubscription {
            url: url.to_string(),
            frequency: default_frequency(),
            channel: default_channel(),
            strategy: strategy.to_string(),
        };

        WatchList {
            users: vec![WatchedUser {
                username: "Nhapham".to_string(),
                email: "nhapham@example.com".to_string(),
                password: "12345".to_string(),
                subscriptions: vec![
                    subscription("https://www.weather.com", "size"),
                    subscription("https://www.news.com", "exact"),
                    subscription("https://www.blog.com", "text"),
                ],
            }],
        }
    }

    // ── Paths ─────────────────────────────────────────────────────────────────

    /// Default location, `~/.site-monitor/watch_list.json`.
    pub fn default_path() -> PathBuf {
        Self::path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Watch-list path rooted at `base_dir` (used for testing).
    pub fn path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".site-monitor").join("watch_list.json")
    }

    // ── Load / save ───────────────────────────────────────────────────────────

    /// Read and parse the watch list at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MonitorError::WatchList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| MonitorError::WatchList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `path`, or write the demo watch list there when it does not exist.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let demo = Self::demo();
        demo.save_to(path)?;
        tracing::info!(path = %path.display(), "wrote demo watch list");
        Ok(demo)
    }

    /// Atomically write the watch list to `path`, creating parent directories
    /// if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    // ── Conversion ────────────────────────────────────────────────────────────

    /// Register every user and add their subscriptions in file order.
    pub fn into_users(self, auth: &AuthenticationService) -> Result<Vec<User>> {
        self.users
            .into_iter()
            .map(|watched| {
                let mut user = auth.register(&watched.username, &watched.email, &watched.password)?;
                for sub in watched.subscriptions {
                    user.add_subscription(
                        sub.url,
                        NotificationPreferences::new(sub.frequency, sub.channel, sub.strategy),
                    );
                }
                Ok(user)
            })
            .collect()
    }

    /// Total number of subscriptions across all users.
    pub fn subscription_count(&self) -> usize {
        self.users.iter().map(|u| u.subscriptions.len()).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
