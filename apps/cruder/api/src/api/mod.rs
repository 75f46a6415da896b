use axum::{Router, middleware, routing::get};
use axum_helpers::api_key_auth;
use axum_helpers::errors::handlers::{method_not_allowed, not_found};
use domain_users::handlers::BASE_PATH;

use crate::state::AppState;

pub mod health;
pub mod users;

/// Creates the `/api/v1/...` routes behind the API-key gate.
///
/// Unknown paths and methods under the users prefix are gated too, so a
/// caller without a key gets 401 rather than 404 or 405.
///
/// Returns a stateless Router; each sub-router has its state applied.
pub fn routes(state: &AppState) -> Router {
    let gate = middleware::from_fn_with_state(state.config.auth.clone(), api_key_auth);

    // A custom 405 set here is kept by create_router and runs inside the gate
    let users = users::router(state)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(gate.clone());

    let unmatched = Router::new().fallback(not_found).layer(gate);

    users.nest(BASE_PATH, unmatched)
}

/// Router with `/ready`, which probes the storage backend.
///
/// Kept outside the API-key gate so orchestrators can call it.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
