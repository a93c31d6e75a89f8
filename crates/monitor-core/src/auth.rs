use uuid::Uuid;

use crate::error::{MonitorError, Result};
use crate::models::{Credentials, User};

/// Creates user accounts. There is no login and passwords are kept as given.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthenticationService;

impl AuthenticationService {
    pub fn new() -> Self {
        Self
    }

    /// Register a new user with a fresh `user-` id and no subscriptions.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(MonitorError::InvalidUser(
                "username must not be empty".to_string(),
            ));
        }

        let user = User::new(
            format!("user-{}", Uuid::new_v4()),
            username,
            Credentials {
                email: email.to_string(),
                password: password.to_string(),
            },
        );
        tracing::debug!(user_id = %user.id, username, "user registered");
        Ok(user)
    }
}
