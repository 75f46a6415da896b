use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, Value,
};
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::{User, UserInput};
use crate::repository::UserRepository;

const COLUMNS: &str = "id, uuid, username, email, full_name";

/// PostgreSQL implementation of UserRepository using SeaORM
///
/// Every method issues exactly one parameterised statement against the
/// `users` table.
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn statement<I>(sql: String, values: I) -> Statement
    where
        I: IntoIterator<Item = Value>,
    {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }

    async fn fetch_one(&self, stmt: Statement) -> RepositoryResult<Option<User>> {
        let row = UserRow::find_by_statement(stmt).one(&self.db).await?;
        Ok(row.map(User::from))
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: i64,
    uuid: Uuid,
    username: String,
    email: String,
    full_name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            uuid: row.uuid,
            username: row.username,
            email: row.email,
            full_name: row.full_name,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let stmt = Self::statement(format!("SELECT {COLUMNS} FROM users ORDER BY id"), Vec::new());
        let rows = UserRow::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let stmt = Self::statement(
            format!("SELECT {COLUMNS} FROM users WHERE username = $1"),
            [username.into()],
        );
        self.fetch_one(stmt).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let stmt = Self::statement(
            format!("SELECT {COLUMNS} FROM users WHERE id = $1"),
            [id.into()],
        );
        self.fetch_one(stmt).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_uuid(&self, uuid: Uuid) -> RepositoryResult<Option<User>> {
        let stmt = Self::statement(
            format!("SELECT {COLUMNS} FROM users WHERE uuid = $1"),
            [uuid.into()],
        );
        self.fetch_one(stmt).await
    }

    #[tracing::instrument(skip(self, input), fields(username = %input.username))]
    async fn create(&self, input: UserInput) -> RepositoryResult<User> {
        let stmt = Self::statement(
            format!(
                "INSERT INTO users (username, email, full_name) VALUES ($1, $2, $3) \
                 RETURNING {COLUMNS}"
            ),
            [
                input.username.into(),
                input.email.into(),
                input.full_name.into(),
            ],
        );

        // INSERT ... RETURNING always yields the new row on success
        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or(sea_orm::DbErr::RecordNotInserted)?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self, input))]
    async fn update(&self, uuid: Uuid, input: UserInput) -> RepositoryResult<Option<User>> {
        let stmt = Self::statement(
            format!(
                "UPDATE users SET username = $1, email = $2, full_name = $3 WHERE uuid = $4 \
                 RETURNING {COLUMNS}"
            ),
            [
                input.username.into(),
                input.email.into(),
                input.full_name.into(),
                uuid.into(),
            ],
        );
        self.fetch_one(stmt).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, uuid: Uuid) -> RepositoryResult<bool> {
        let stmt = Self::statement("DELETE FROM users WHERE uuid = $1".to_string(), [uuid.into()]);
        let result = self.db.execute_raw(stmt).await?;
        Ok(result.rows_affected() > 0)
    }
}
