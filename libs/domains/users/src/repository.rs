use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{User, UserInput};

/// Storage access for users.
///
/// Lookups return `Ok(None)` when no row matches; only real failures are
/// errors. Writes that collide with an existing `username` or `email`
/// return [`RepositoryError::DuplicateKey`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, ordered by id
    async fn list(&self) -> RepositoryResult<Vec<User>>;

    async fn get_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    async fn get_by_uuid(&self, uuid: Uuid) -> RepositoryResult<Option<User>>;

    /// Insert a user; storage assigns `id` and `uuid`
    async fn create(&self, input: UserInput) -> RepositoryResult<User>;

    /// Overwrite the mutable fields; `None` when no user has this uuid
    async fn update(&self, uuid: Uuid, input: UserInput) -> RepositoryResult<Option<User>>;

    /// `false` when no row was deleted
    async fn delete(&self, uuid: Uuid) -> RepositoryResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl Store {
    fn collides(&self, input: &UserInput, except: Option<i64>) -> bool {
        self.users.values().any(|u| {
            Some(u.id) != except && (u.username == input.username || u.email == input.email)
        })
    }
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Mirrors the table constraints: unique `username` and `email`, ids that
/// grow monotonically and are never reused after a delete.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn get_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn get_by_uuid(&self, uuid: Uuid) -> RepositoryResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.uuid == uuid).cloned())
    }

    async fn create(&self, input: UserInput) -> RepositoryResult<User> {
        let mut store = self.store.write().await;

        if store.collides(&input, None) {
            return Err(RepositoryError::DuplicateKey);
        }

        store.next_id += 1;
        let user = User {
            id: store.next_id,
            uuid: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            full_name: input.full_name,
        };
        store.users.insert(user.id, user.clone());

        tracing::debug!(user_id = user.id, user_uuid = %user.uuid, "Created user");
        Ok(user)
    }

    async fn update(&self, uuid: Uuid, input: UserInput) -> RepositoryResult<Option<User>> {
        let mut store = self.store.write().await;

        let Some(id) = store.users.values().find(|u| u.uuid == uuid).map(|u| u.id) else {
            return Ok(None);
        };

        if store.collides(&input, Some(id)) {
            return Err(RepositoryError::DuplicateKey);
        }

        let Some(user) = store.users.get_mut(&id) else {
            return Ok(None);
        };
        user.username = input.username;
        user.email = input.email;
        user.full_name = input.full_name;

        Ok(Some(user.clone()))
    }

    async fn delete(&self, uuid: Uuid) -> RepositoryResult<bool> {
        let mut store = self.store.write().await;

        let id = store.users.values().find(|u| u.uuid == uuid).map(|u| u.id);
        Ok(id.and_then(|id| store.users.remove(&id)).is_some())
    }
}
