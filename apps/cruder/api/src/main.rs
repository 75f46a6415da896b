use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StorageBackend};
use state::{AppState, Storage};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);
    info!(?config, "Configuration loaded");

    let storage = match config.storage {
        StorageBackend::Postgres => {
            let db = database::postgres::connect_from_config(config.database.clone()).await?;
            Storage::Postgres(db)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Storage::Memory(domain_users::InMemoryUserRepository::new())
        }
    };

    if !config.auth.is_enabled() {
        warn!("API_KEY is not set; the API accepts unauthenticated requests");
    }

    let state = AppState { config, storage };

    // Probes sit outside the API-key gate; create_router wraps everything
    // in the request logger and adds docs plus the JSON 404 fallback.
    let app_routes = api::routes(&state)
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));
    let router = create_router::<openapi::ApiDoc>(app_routes);

    create_app(router, &state.config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    if let Storage::Postgres(db) = state.storage {
        database::postgres::close(db).await;
    }

    info!("cruder API shutdown complete");
    Ok(())
}
