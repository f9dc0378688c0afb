use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for the credential lifecycle service.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user with validated credentials.
    ///
    /// Hashes the password and stores the record through the registry.
    /// The returned record still carries the password hash; the transport
    /// layer strips it before external exposure.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user record
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHash` - Password hashing failed
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Authenticate a user by identifier and password, minting a bearer token.
    ///
    /// The identifier matches either the username or the email. A lookup
    /// miss and a password mismatch both return `InvalidCredentials` so the
    /// caller cannot tell which one occurred.
    ///
    /// # Arguments
    /// * `identifier` - Username or email address
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// The matching user record and a signed token bound to its identity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password
    /// * `TokenIssuance` - Token signing failed
    async fn login(&self, identifier: &str, password: &str) -> Result<(User, String), UserError>;

    /// Retrieve all users in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Delete a user by id.
    ///
    /// # Errors
    /// * `NotFound` - No record with this id (including repeated deletes)
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Storage operations for user records.
///
/// The registry is the sole owner of user records and enforces the
/// username/email uniqueness invariant atomically with record creation.
#[async_trait]
pub trait UserRegistry: Send + Sync + 'static {
    /// Persist a new user record, assigning the next sequential id.
    ///
    /// The duplicate checks and the append are performed atomically with
    /// respect to other mutations. When both fields collide, the username
    /// error is reported.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password_hash` - Digest produced by the password hasher
    ///
    /// # Returns
    /// The full created record including its assigned id
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    async fn create(
        &self,
        username: Username,
        email: EmailAddress,
        password_hash: String,
    ) -> Result<User, UserError>;

    /// Retrieve a user whose username or email exactly matches `identifier`.
    ///
    /// # Returns
    /// Optional user record (None if not found)
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all user records in insertion order.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Remove the record with the given id.
    ///
    /// # Errors
    /// * `NotFound` - No record with this id; repeated deletes of the same
    ///   id after the first also return `NotFound`
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
