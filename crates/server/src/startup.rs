use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::{Migrator, MigratorTrait};
use service::person::repo::{InMemoryPersonRepository, SeaOrmPersonRepository};
use service::person::repository::PersonRepository;
use service::seed::seed_people;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured store; Postgres is migrated before use.
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn PersonRepository>, StartupError> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            info!(backend = "memory", "using in-memory person store");
            Ok(Arc::new(InMemoryPersonRepository::new()))
        }
        StorageBackend::Postgres => {
            let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
            let db = models::db::connect_with_config(&db_cfg)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Storage(format!("migration failed: {e}")))?;
            info!(backend = "postgres", "database connected and migrated");
            Ok(Arc::new(SeaOrmPersonRepository::new(db)))
        }
    }
}

pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let repo = build_repository(cfg).await?;
    if cfg.storage.seed {
        seed_people(&*repo)
            .await
            .map_err(|e| StartupError::Storage(format!("seeding failed: {e}")))?;
    }
    Ok(ServerState::new(repo))
}

/// Router for an already constructed state.
pub fn app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve `cfg` until Ctrl+C; in-flight requests finish before returning.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "person service listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}
