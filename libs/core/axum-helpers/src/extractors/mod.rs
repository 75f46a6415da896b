//! Custom extractors for Axum handlers.
//!
//! They turn framework rejections into [`AppError`](crate::AppError) so
//! malformed input always produces the standard error body.

pub mod id_path;
pub mod json_body;

pub use id_path::IdPath;
pub use json_body::JsonBody;
