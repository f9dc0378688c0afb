//! Authentication infrastructure library
//!
//! Provides the credential primitives used by the account service:
//! - Password hashing (Argon2id) with per-call random salts
//! - JWT bearer token issuance and validation
//! - An authenticator coordinating both for the login flow
//!
//! The service defines its own domain ports and adapts these implementations,
//! keeping credential handling out of the domain layer.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtHandler, Claims};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_identity(7, "alice", "alice@example.com", 24);
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "7");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = Claims::for_identity(7, "alice", "alice@example.com", 24);
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token on a protected request
//! let decoded: Claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.username().as_deref(), Some("alice"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
