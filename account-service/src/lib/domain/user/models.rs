use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered account. Records are immutable after creation;
/// the only lifecycle transition is deletion by id.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type.
///
/// Assigned sequentially by the registry from a monotonic counter, so ids
/// are never reused even after deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - Decimal integer string to parse
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid integer id
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type.
///
/// Usernames are opaque case-sensitive strings; uniqueness is enforced by
/// exact string equality with no normalization. The only structural
/// requirement is that they are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is an empty string
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }
        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type.
///
/// Like usernames, emails are matched by exact string equality; no
/// normalization or format canonicalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address.
    ///
    /// # Errors
    /// * `Empty` - Email is an empty string
    pub fn new(email: String) -> Result<Self, EmailError> {
        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        Ok(Self(email))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new user with domain types.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterUserCommand {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password` - Plain text password (hashed by the service)
    pub fn new(username: Username, email: EmailAddress, password: String) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_empty() {
        assert!(matches!(
            Username::new(String::new()),
            Err(UsernameError::Empty)
        ));
        assert_eq!(Username::new("alice".to_string()).unwrap().as_str(), "alice");
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let lower = Username::new("alice".to_string()).unwrap();
        let upper = Username::new("Alice".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_email_rejects_empty() {
        assert!(matches!(
            EmailAddress::new(String::new()),
            Err(EmailError::Empty)
        ));
    }

    #[test]
    fn test_user_id_from_string() {
        assert_eq!(UserId::from_string("42").unwrap(), UserId(42));
        assert!(UserId::from_string("abc").is_err());
        assert!(UserId::from_string("").is_err());
    }
}
