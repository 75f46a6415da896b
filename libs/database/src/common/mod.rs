//! Error types shared across the database helpers

pub mod error;

pub use error::{DatabaseError, DatabaseResult};
