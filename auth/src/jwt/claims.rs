use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims embedded in a bearer token.
///
/// Claims are a snapshot of the user's identity at issuance time; later
/// changes to the underlying record (including deletion) do not invalidate
/// tokens that are already in circulation before their expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Additional identity fields (flattened into the token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims for a user with automatic expiration.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `username` - Username (stored in `extra.username`)
    /// * `email` - Email address (stored in `extra.email`)
    /// * `validity_hours` - Hours until the token expires
    pub fn for_identity(
        user_id: impl ToString,
        username: impl Into<String>,
        email: impl Into<String>,
        validity_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(validity_hours);

        let username: String = username.into();
        let email: String = email.into();
        let mut extra = HashMap::new();
        extra.insert("username".to_string(), serde_json::json!(username));
        extra.insert("email".to_string(), serde_json::json!(email));

        Self {
            sub: user_id.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            extra,
        }
    }

    /// Override the expiration timestamp.
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Get username from extra fields (convenience method).
    pub fn username(&self) -> Option<String> {
        self.extra
            .get("username")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get email from extra fields (convenience method).
    pub fn email(&self) -> Option<String> {
        self.extra
            .get("email")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Check if the token is expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
