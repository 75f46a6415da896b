//! Cross-cutting request middleware.
//!
//! - [`api_key`]: static `X-API-Key` gate
//! - [`request_log`]: one structured log record per request

pub mod api_key;
pub mod request_log;

pub use api_key::{API_KEY_HEADER, ApiKeyConfig, api_key_auth};
pub use request_log::{request_logger, severity_for_status};
