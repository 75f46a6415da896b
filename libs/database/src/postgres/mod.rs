//! PostgreSQL connector and probes
//!
//! The pool is opened once at startup. There is no retry loop: a failed
//! connect is reported to the caller, which decides whether to exit.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE_URL, PostgresConfig};
pub use connector::{close, connect_from_config};
pub use health::check_health;

pub use sea_orm::DatabaseConnection;
