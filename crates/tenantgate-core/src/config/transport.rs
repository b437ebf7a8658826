//! Transport-security configuration for issued credentials.

use serde::{Deserialize, Serialize};

/// Attributes a caller applies when delivering the session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Cookie name the caller should store the credential under.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the credential must be delivered cross-site
    /// (the app runs inside the chat host's embedded web view).
    #[serde(default = "default_true")]
    pub cross_site: bool,
    /// Restrict the credential to secure transports.
    #[serde(default = "default_true")]
    pub secure: bool,
    /// Hide the credential from client-side scripts.
    #[serde(default = "default_true")]
    pub http_only: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cross_site: true,
            secure: true,
            http_only: true,
        }
    }
}

fn default_cookie_name() -> String {
    "tg_session".to_string()
}

fn default_true() -> bool {
    true
}
