//! folio-api server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use folio_api::{app, logging, AppState, ServerConfig, StorageBackend};
use folio_core::NoteRepository;
use folio_db::{Database, MemNoteRepository, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = logging::init_logging();

    let config = ServerConfig::from_env()?;

    let notes: Arc<dyn NoteRepository> = match config.storage {
        StorageBackend::Postgres => {
            let pool_config = PoolConfig::from_env();
            info!(
                subsystem = "api",
                max_connections = pool_config.max_connections,
                "Connecting to database"
            );
            let db = Database::connect_with_config(&config.database_url, pool_config).await?;
            db.migrate().await?;
            info!(subsystem = "api", "Database migrations applied");
            Arc::new(db.notes)
        }
        StorageBackend::Memory => {
            info!(
                subsystem = "api",
                seed_welcome = config.seed_welcome,
                "Using in-memory note storage"
            );
            if config.seed_welcome {
                Arc::new(MemNoteRepository::with_welcome_note())
            } else {
                Arc::new(MemNoteRepository::new())
            }
        }
    };

    let router = app(AppState::new(notes), &config);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
