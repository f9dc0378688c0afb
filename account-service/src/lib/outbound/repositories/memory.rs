use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRegistry;
use crate::user::errors::UserError;

/// In-memory user registry.
///
/// Storage is process-lifetime only. Records live in insertion order behind
/// a single RwLock: create/delete take the write lock so the duplicate check
/// and the append happen atomically, while lookups and listings share the
/// read lock and never observe a partially applied mutation.
pub struct InMemoryUserRegistry {
    state: RwLock<RegistryState>,
}

struct RegistryState {
    users: Vec<User>,
    // Monotonic id source, deliberately decoupled from users.len() so ids
    // are never reused after deletes
    next_id: i64,
}

impl InMemoryUserRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryUserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    async fn create(
        &self,
        username: Username,
        email: EmailAddress,
        password_hash: String,
    ) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        // Username is checked before email; when both collide the client
        // sees the username error
        if state.users.iter().any(|u| u.username == username) {
            return Err(UserError::UsernameAlreadyExists(
                username.as_str().to_string(),
            ));
        }
        if state.users.iter().any(|u| u.email == email) {
            return Err(UserError::EmailAlreadyExists(email.as_str().to_string()));
        }

        let id = UserId(state.next_id);
        state.next_id += 1;

        let user = User {
            id,
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;

        Ok(state
            .users
            .iter()
            .find(|u| u.username.as_str() == identifier || u.email.as_str() == identifier)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let state = self.state.read().await;

        Ok(state.users.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.write().await;

        match state.users.iter().position(|u| u.id == *id) {
            Some(index) => {
                state.users.remove(index);
                Ok(())
            }
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}
