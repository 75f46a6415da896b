use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors produced by a [`UserRepository`](crate::repository::UserRepository).
///
/// Absence is not an error at this layer; lookups return `Option`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint on `username` or `email` rejected the write.
    #[error("username or email already exists")]
    DuplicateKey,

    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::DuplicateKey,
            _ => RepositoryError::Database(err),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("username or email already exists")]
    DuplicateKey,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<RepositoryError> for UserError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateKey => UserError::DuplicateKey,
            RepositoryError::Database(e) => UserError::Internal(e.to_string()),
        }
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(what) => AppError::NotFound(format!("user not found: {}", what)),
            UserError::DuplicateKey => {
                AppError::Conflict("username or email already exists".to_string())
            }
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
