//! Readiness probe with a real storage check.

use crate::state::{AppState, Storage};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// 200 when storage answers, 503 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let (name, check): (&str, HealthCheckFuture<'_>) = match &state.storage {
        Storage::Postgres(db) => (
            "database",
            Box::pin(async move {
                database::postgres::check_health(db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        Storage::Memory(_) => ("storage", Box::pin(async { Ok::<(), String>(()) })),
    };

    match run_health_checks(vec![(name, check)]).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
