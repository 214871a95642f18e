//! Principal model - the slice of a user account the core needs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account that can submit drafts and, when flagged, review them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    /// Unique login address, also the notification target
    pub email: String,
    /// Display name; falls back to the email when not provided
    pub username: String,
    /// Reviewers receive draft submissions and may approve or reject them
    pub is_reviewer: bool,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            id: Uuid::new_v4(),
            username: email.clone(),
            email,
            is_reviewer: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_reviewer(mut self, is_reviewer: bool) -> Self {
        self.is_reviewer = is_reviewer;
        self
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.email)
    }
}
