use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::strategy::ComparisonStrategy;

/// Content of a monitored resource captured at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Raw fetched body.
    pub content: String,
    /// UTC timestamp of the fetch that produced this snapshot.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture `content` stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Delivery preferences attached to a subscription.
///
/// `frequency` and `channel` are advisory; only `strategy` drives change
/// detection. The strategy is kept as the raw key so that a bad key surfaces
/// when the subscription is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub frequency: String,
    pub channel: String,
    pub strategy: String,
}

impl NotificationPreferences {
    pub fn new(
        frequency: impl Into<String>,
        channel: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            frequency: frequency.into(),
            channel: channel.into(),
            strategy: strategy.into(),
        }
    }
}

/// A user's request to monitor one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// `sub-` followed by a random UUID.
    pub id: String,
    /// URL of the monitored resource.
    pub url: String,
    pub preferences: NotificationPreferences,
}

/// Login details stored with a user. Kept in plain text.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A registered user and the subscriptions they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `user-` followed by a random UUID.
    pub id: String,
    pub username: String,
    pub credentials: Credentials,
    /// Append-only, in insertion order.
    subscriptions: Vec<Subscription>,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            credentials,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribe to `url` and return the generated subscription id.
    pub fn add_subscription(
        &mut self,
        url: impl Into<String>,
        preferences: NotificationPreferences,
    ) -> String {
        let id = format!("sub-{}", Uuid::new_v4());
        self.subscriptions.push(Subscription {
            id: id.clone(),
            url: url.into(),
            preferences,
        });
        id
    }

    /// Subscriptions in the order they were added.
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

/// Event fanned out to every listener when a change is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub url: String,
    /// Name of the user owning the subscription that detected the change.
    pub username: String,
    pub message: String,
    pub strategy: ComparisonStrategy,
    pub detected_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Build an event with the standard message text.
    pub fn detected(
        url: impl Into<String>,
        username: impl Into<String>,
        strategy: ComparisonStrategy,
    ) -> Self {
        let url = url.into();
        let message = format!("Change detected at {url} using {strategy} comparison");
        Self {
            url,
            username: username.into(),
            message,
            strategy,
            detected_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "user-1",
            "alice",
            Credentials {
                email: "alice@example.com".to_string(),
                password: "hunter2".to_string(),
            },
        )
    }

    #[test]
    fn test_add_subscription_preserves_order() {
        let mut user = user();
        let prefs = NotificationPreferences::new("daily", "email", "size");
        user.add_subscription("https://a.example", prefs.clone());
        user.add_subscription("https://b.example", prefs.clone());
        user.add_subscription("https://c.example", prefs);

        let urls: Vec<&str> = user.subscriptions().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, ["https://a.example", "https://b.example", "https://c.example"]);
    }

    #[test]
    fn test_add_subscription_returns_fresh_ids() {
        let mut user = user();
        let prefs = NotificationPreferences::new("daily", "email", "exact");
        let first = user.add_subscription("https://a.example", prefs.clone());
        let second = user.add_subscription("https://a.example", prefs);

        assert!(first.starts_with("sub-"));
        assert_ne!(first, second);
        assert_eq!(user.subscriptions()[0].id, first);
        assert_eq!(user.subscriptions()[1].id, second);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", user().credentials);
        assert!(rendered.contains("alice@example.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_change_event_message() {
        let event = ChangeEvent::detected(
            "https://www.news.com",
            "alice",
            ComparisonStrategy::ExactMatch,
        );
        assert_eq!(
            event.message,
            "Change detected at https://www.news.com using exact comparison"
        );
        assert_eq!(event.username, "alice");
    }

    #[test]
    fn test_snapshot_new_stamps_time() {
        let before = Utc::now();
        let snap = Snapshot::new("body");
        assert_eq!(snap.content, "body");
        assert!(snap.fetched_at >= before);
    }
}
