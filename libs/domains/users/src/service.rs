use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserInput};
use crate::repository::UserRepository;

/// Service layer for User business logic
///
/// Turns "no such row" from storage into [`UserError::NotFound`] for every
/// single-user operation. Listing never fails on an empty table.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        Ok(self.repository.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> UserResult<User> {
        self.repository
            .get_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("username {}", username)))
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: i64) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("id {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_uuid(&self, uuid: Uuid) -> UserResult<User> {
        self.repository
            .get_by_uuid(uuid)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("uuid {}", uuid)))
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: UserInput) -> UserResult<User> {
        let user = self.repository.create(input).await?;
        tracing::info!(user_id = user.id, user_uuid = %user.uuid, "Created user");
        Ok(user)
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, uuid: Uuid, input: UserInput) -> UserResult<User> {
        let user = self
            .repository
            .update(uuid, input)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("uuid {}", uuid)))?;
        tracing::info!(user_id = user.id, user_uuid = %user.uuid, "Updated user");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, uuid: Uuid) -> UserResult<()> {
        if self.repository.delete(uuid).await? {
            tracing::info!(user_uuid = %uuid, "Deleted user");
            Ok(())
        } else {
            Err(UserError::NotFound(format!("uuid {}", uuid)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepositoryError;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    fn sample(id: i64) -> User {
        User {
            id,
            uuid: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            full_name: "Alice A".into(),
        }
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() {
        let mut repo = MockUserRepository::new();
        repo.expect_list().times(1).returning(|| Ok(vec![]));

        let service = UserService::new(repo);
        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_absent_lookups_become_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_username().returning(|_| Ok(None));
        repo.expect_get_by_id().with(eq(999_999)).returning(|_| Ok(None));
        repo.expect_get_by_uuid().returning(|_| Ok(None));

        let service = UserService::new(repo);
        assert!(matches!(
            service.get_user_by_username("ghost").await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(
            service.get_user_by_id(999_999).await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(
            service.get_user_by_uuid(Uuid::new_v4()).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_found_lookup_is_returned_unchanged() {
        let user = sample(7);
        let expected = user.clone();
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .with(eq(7))
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(repo);
        assert_eq!(service.get_user_by_id(7).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_update_zero_rows_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_update().returning(|_, _| Ok(None));

        let service = UserService::new(repo);
        let result = service
            .update_user(Uuid::new_v4(), UserInput::new("a", "b", "c"))
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_not_found() {
        let uuid = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .with(eq(uuid))
            .times(1)
            .returning(|_| Ok(false));

        let service = UserService::new(repo);
        assert!(matches!(
            service.delete_user(uuid).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(true));

        let service = UserService::new(repo);
        assert!(service.delete_user(Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_key_passes_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_| Err(RepositoryError::DuplicateKey));
        repo.expect_update()
            .returning(|_, _| Err(RepositoryError::DuplicateKey));

        let service = UserService::new(repo);
        assert!(matches!(
            service.create_user(UserInput::new("bob", "b@x.com", "")).await,
            Err(UserError::DuplicateKey)
        ));
        assert!(matches!(
            service
                .update_user(Uuid::new_v4(), UserInput::new("bob", "b@x.com", ""))
                .await,
            Err(UserError::DuplicateKey)
        ));
    }

    #[tokio::test]
    async fn test_database_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .returning(|| Err(RepositoryError::Database(DbErr::Custom("pool closed".into()))));

        let service = UserService::new(repo);
        assert!(matches!(
            service.list_users().await,
            Err(UserError::Internal(msg)) if msg.contains("pool closed")
        ));
    }
}
