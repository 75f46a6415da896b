//! Users Domain
//!
//! CRUD over the `users` table, exposed under `/api/v1/users`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, path/body parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← absent → NotFound, storage errors → domain errors
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← one SQL statement per call (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, UserInput
//! └─────────────┘
//! ```
//!
//! Errors get one step coarser per layer: `Option`/`RepositoryError` in
//! storage, [`UserError`] in the service, an HTTP status in the handlers.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{RepositoryError, RepositoryResult, UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{User, UserInput};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
