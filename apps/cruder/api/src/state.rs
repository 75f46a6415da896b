//! Application state shared by the route builders.

use database::postgres::DatabaseConnection;
use domain_users::InMemoryUserRepository;

/// The storage selected at startup.
#[derive(Clone)]
pub enum Storage {
    Postgres(DatabaseConnection),
    Memory(InMemoryUserRepository),
}

/// Shared application state.
///
/// Cloning is cheap: the connection pool and in-memory store are both
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    pub storage: Storage,
}
