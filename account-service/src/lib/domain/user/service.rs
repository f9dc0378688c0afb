use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRegistry;
use crate::user::ports::UserServicePort;

/// Credential lifecycle service.
///
/// Orchestrates the registry, the password hasher, and the token issuer to
/// implement registration and login as validation, side effect, response.
/// Constructed explicitly and injected into request handlers, so tests can
/// run against isolated instances.
pub struct UserService<R>
where
    R: UserRegistry,
{
    registry: Arc<R>,
    authenticator: Arc<Authenticator>,
    token_validity_hours: i64,
}

impl<R> UserService<R>
where
    R: UserRegistry,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `registry` - User record storage implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `token_validity_hours` - Bearer token lifetime
    pub fn new(
        registry: Arc<R>,
        authenticator: Arc<Authenticator>,
        token_validity_hours: i64,
    ) -> Self {
        Self {
            registry,
            authenticator,
            token_validity_hours,
        }
    }
}

#[async_trait]
impl<R> UserServicePort for UserService<R>
where
    R: UserRegistry,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        // Duplicates are rejected before the hash is computed, username
        // first. The registry repeats the check under its write lock, so a
        // concurrent registration that slips past this point is still
        // caught at insert time.
        if let Some(existing) = self
            .registry
            .find_by_identifier(command.username.as_str())
            .await?
        {
            if existing.username == command.username {
                return Err(UserError::UsernameAlreadyExists(
                    command.username.as_str().to_string(),
                ));
            }
        }
        if let Some(existing) = self
            .registry
            .find_by_identifier(command.email.as_str())
            .await?
        {
            if existing.email == command.email {
                return Err(UserError::EmailAlreadyExists(
                    command.email.as_str().to_string(),
                ));
            }
        }

        // Hashing is CPU-bound; run it off the async dispatch path so one
        // slow hash does not block unrelated requests
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
                .await
                .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
                .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        self.registry
            .create(command.username, command.email, password_hash)
            .await
    }

    async fn login(&self, identifier: &str, password: &str) -> Result<(User, String), UserError> {
        // A lookup miss maps to the same error as a password mismatch below,
        // so responses never reveal whether the identifier exists
        let user = self
            .registry
            .find_by_identifier(identifier)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let claims = Claims::for_identity(
            user.id,
            user.username.as_str(),
            user.email.as_str(),
            self.token_validity_hours,
        );

        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &claims)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            AuthenticationError::PasswordError(err) => UserError::PasswordHash(err.to_string()),
            AuthenticationError::JwtError(err) => UserError::TokenIssuance(err.to_string()),
        })?;

        Ok((user, result.access_token))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.registry.list_all().await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.registry.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Username;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRegistry {}

        #[async_trait]
        impl UserRegistry for TestUserRegistry {
            async fn create(
                &self,
                username: Username,
                email: EmailAddress,
                password_hash: String,
            ) -> Result<User, UserError>;
            async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn service_with(registry: MockTestUserRegistry) -> UserService<MockTestUserRegistry> {
        UserService::new(
            Arc::new(registry),
            Arc::new(Authenticator::new(TEST_SECRET)),
            24,
        )
    }

    fn stored_user(id: i64, username: &str, email: &str, password: &str) -> User {
        let hash = Authenticator::new(TEST_SECRET)
            .hash_password(password)
            .unwrap();
        User {
            id: UserId(id),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hash,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_user_hashes_password() {
        let mut registry = MockTestUserRegistry::new();

        registry
            .expect_find_by_identifier()
            .times(2)
            .returning(|_| Ok(None));
        registry
            .expect_create()
            .withf(|username, email, password_hash| {
                username.as_str() == "testuser"
                    && email.as_str() == "test@example.com"
                    && password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|username, email, password_hash| {
                Ok(User {
                    id: UserId(1),
                    username,
                    email,
                    password_hash,
                    created_at: Utc::now(),
                })
            });

        let service = service_with(registry);

        let command = RegisterUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
        };

        let user = service.register_user(command).await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.username.as_str(), "testuser");
        // The plaintext never reaches the registry
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_register_user_duplicate_username_rejected_before_hashing() {
        let mut registry = MockTestUserRegistry::new();

        let existing = stored_user(1, "testuser", "taken@example.com", "pw");
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "testuser")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        // The duplicate is caught before any hash is computed or stored
        registry.expect_create().times(0);

        let service = service_with(registry);

        let command = RegisterUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test2@example.com".to_string()).unwrap(),
            password: "password456".to_string(),
        };

        let result = service.register_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_user_duplicate_email_rejected_before_hashing() {
        let mut registry = MockTestUserRegistry::new();

        let existing = stored_user(1, "other", "test@example.com", "pw");
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "user2")
            .times(1)
            .returning(|_| Ok(None));
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "test@example.com")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        registry.expect_create().times(0);

        let service = service_with(registry);

        let command = RegisterUserCommand {
            username: Username::new("user2".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password456".to_string(),
        };

        let result = service.register_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_user_concurrent_duplicate_caught_on_insert() {
        let mut registry = MockTestUserRegistry::new();

        // Pre-checks see nothing, as when a competing registration lands
        // between the check and the insert; the registry's own check under
        // the write lock still rejects the insert
        registry
            .expect_find_by_identifier()
            .times(2)
            .returning(|_| Ok(None));
        registry.expect_create().times(1).returning(|_, email, _| {
            Err(UserError::EmailAlreadyExists(email.as_str().to_string()))
        });

        let service = service_with(registry);

        let command = RegisterUserCommand {
            username: Username::new("user2".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password456".to_string(),
        };

        let result = service.register_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_user_empty_password() {
        let mut registry = MockTestUserRegistry::new();
        registry
            .expect_find_by_identifier()
            .times(2)
            .returning(|_| Ok(None));
        registry.expect_create().times(0);

        let service = service_with(registry);

        let command = RegisterUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: String::new(),
        };

        let result = service.register_user(command).await;
        assert!(matches!(result.unwrap_err(), UserError::PasswordHash(_)));
    }

    #[tokio::test]
    async fn test_login_by_username() {
        let mut registry = MockTestUserRegistry::new();

        let user = stored_user(1, "alice", "alice@example.com", "pw123");
        let returned_user = user.clone();
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "alice")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let service = service_with(registry);

        let (logged_in, token) = service.login("alice", "pw123").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(!token.is_empty());

        // The token is bound to the user's identity snapshot
        let claims: Claims = Authenticator::new(TEST_SECRET).validate_token(&token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.username(), Some("alice".to_string()));
        assert_eq!(claims.email(), Some("alice@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let mut registry = MockTestUserRegistry::new();

        let user = stored_user(2, "bob", "bob@example.com", "hunter2!");
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "bob@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service_with(registry);

        let (logged_in, token) = service.login("bob@example.com", "hunter2!").await.unwrap();
        assert_eq!(logged_in.username.as_str(), "bob");
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_login_unknown_identifier_and_wrong_password_are_indistinguishable() {
        let mut registry = MockTestUserRegistry::new();

        let user = stored_user(1, "alice", "alice@example.com", "pw123");
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "nobody")
            .times(1)
            .returning(|_| Ok(None));
        registry
            .expect_find_by_identifier()
            .withf(|identifier| identifier == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service_with(registry);

        let miss = service.login("nobody", "pw123").await.unwrap_err();
        let mismatch = service.login("alice", "wrong").await.unwrap_err();

        // Both failure modes collapse into the same generic error
        assert!(matches!(miss, UserError::InvalidCredentials));
        assert!(matches!(mismatch, UserError::InvalidCredentials));
        assert_eq!(miss.to_string(), mismatch.to_string());
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut registry = MockTestUserRegistry::new();

        let users = vec![
            stored_user(1, "alice", "alice@example.com", "pw1"),
            stored_user(2, "bob", "bob@example.com", "pw2"),
        ];
        registry
            .expect_list_all()
            .times(1)
            .returning(move || Ok(users.clone()));

        let service = service_with(registry);

        let listed = service.list_users().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].username.as_str(), "alice");
        assert_eq!(listed[1].username.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut registry = MockTestUserRegistry::new();

        registry
            .expect_delete()
            .withf(|id| *id == UserId(99))
            .times(1)
            .returning(|id| Err(UserError::NotFound(id.to_string())));

        let service = service_with(registry);

        let result = service.delete_user(&UserId(99)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
