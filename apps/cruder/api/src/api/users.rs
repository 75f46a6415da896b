use axum::Router;
use domain_users::{PgUserRepository, UserService, handlers};

use crate::state::{AppState, Storage};

/// Users routes backed by whichever storage was selected at startup.
pub fn router(state: &AppState) -> Router {
    match &state.storage {
        Storage::Postgres(db) => {
            handlers::router(UserService::new(PgUserRepository::new(db.clone())))
        }
        Storage::Memory(repo) => handlers::router(UserService::new(repo.clone())),
    }
}
