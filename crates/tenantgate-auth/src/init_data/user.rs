//! Identity shapes carried by a verified payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `user` object embedded in init data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitDataUser {
    /// External (chat-host) user id.
    pub id: i64,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Public username.
    #[serde(default)]
    pub username: Option<String>,
    /// IETF language tag of the user's client.
    #[serde(default)]
    pub language_code: Option<String>,
    /// Whether the user has a premium subscription on the host.
    #[serde(default)]
    pub is_premium: Option<bool>,
    /// Whether the user allowed the bot to message them.
    #[serde(default)]
    pub allows_write_to_pm: Option<bool>,
    /// Profile photo URL.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A payload whose signature and freshness have been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    /// The verified user.
    pub user: InitDataUser,
    /// When the host signed the payload.
    pub auth_date: DateTime<Utc>,
    /// Inline query session id, if launched from an inline query.
    pub query_id: Option<String>,
    /// Deep-link start parameter (commonly a tenant slug).
    pub start_param: Option<String>,
    /// Type of chat the app was opened from.
    pub chat_type: Option<String>,
    /// Global identifier of the chat the app was opened from.
    pub chat_instance: Option<String>,
}

impl VerifiedUser {
    /// The external user id handed to the identity repository.
    pub fn external_user_id(&self) -> i64 {
        self.user.id
    }
}
