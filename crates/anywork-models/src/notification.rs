//! Notification models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Unique identifier for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

impl NotificationId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NotificationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A user notification. Created server-side; the client only flips
/// `is_read` and deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: NotificationId,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub user: UserId,
}

/// Body for creating a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNotificationPayload {
    pub message: String,
    pub user: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}
