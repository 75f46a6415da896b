use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use core_config::{ConfigError, FromEnv, env_optional};
use std::fmt;
use std::sync::Arc;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret configuration for [`api_key_auth`].
///
/// Built once at startup and handed to the middleware as state. Without a
/// key the gate lets every request through.
#[derive(Clone, Default)]
pub struct ApiKeyConfig {
    api_key: Option<Arc<str>>,
}

#[derive(Debug, PartialEq, Eq)]
enum KeyCheck {
    Allowed,
    Missing,
    Invalid,
}

impl ApiKeyConfig {
    /// Blank keys are treated as no key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key
                .filter(|k| !k.trim().is_empty())
                .map(Arc::from),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn check(&self, presented: Option<&str>) -> KeyCheck {
        let Some(expected) = self.api_key.as_deref() else {
            return KeyCheck::Allowed;
        };
        match presented {
            None | Some("") => KeyCheck::Missing,
            Some(key) if key == expected => KeyCheck::Allowed,
            Some(_) => KeyCheck::Invalid,
        }
    }
}

impl fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl FromEnv for ApiKeyConfig {
    /// Reads `API_KEY`; unset or empty disables the gate.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(env_optional("API_KEY")))
    }
}

/// Axum middleware enforcing the `X-API-Key` header.
///
/// - no key configured: pass through
/// - header missing or empty: 401
/// - header present but different: 403
///
/// # Example
/// ```ignore
/// use axum::middleware;
/// use axum_helpers::middleware::{ApiKeyConfig, api_key_auth};
///
/// let gated = routes.layer(middleware::from_fn_with_state(config, api_key_auth));
/// ```
pub async fn api_key_auth(
    State(config): State<ApiKeyConfig>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header value that is not visible ASCII can never equal the key.
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|v| v.to_str().unwrap_or("\u{0}"));

    match config.check(presented) {
        KeyCheck::Allowed => Ok(next.run(request).await),
        KeyCheck::Missing => Err(AppError::Unauthorized(
            "missing X-API-Key header".to_string(),
        )),
        KeyCheck::Invalid => Err(AppError::Forbidden("invalid API key".to_string())),
    }
}
