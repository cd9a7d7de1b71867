//! HTTP server initialization and runtime setup.
//!
//! Handles the link store connection, export storage, and the Axum server
//! lifecycle including graceful shutdown.

use crate::config::{Config, LinkStoreKind};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::export::LocalExportStorage;
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the link store (PostgreSQL with migrations applied, or in-memory)
/// - the export directory
/// - the Axum HTTP server, which drains in-flight requests on Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The export directory cannot be created
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let link_repository = open_link_store(&config).await?;

    let export_storage = LocalExportStorage::new(&config.export_dir, &config.public_base_url)
        .await
        .with_context(|| {
            format!(
                "Failed to prepare export directory {}",
                config.export_dir.display()
            )
        })?;

    let state = AppState::build(
        link_repository,
        Arc::new(export_storage),
        config.export_timezone,
        &config.public_base_url,
    );

    let app = app_router(state, &config.export_dir);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the configured link store.
async fn open_link_store(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.link_store {
        LinkStoreKind::Postgres => {
            let pool = connect_database(config).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        LinkStoreKind::Memory => {
            tracing::warn!("Using in-memory link store; links are lost on restart");
            Ok(Arc::new(InMemoryLinkRepository::new()))
        }
    }
}

/// Connects to PostgreSQL, retrying with exponential backoff.
///
/// Makes `db_connect_retries` extra attempts, waiting 500ms, 1s, 2s... (capped
/// at 10s, with jitter) between them.
///
/// # Errors
///
/// Returns the last connection error once every attempt has failed, or an
/// error if no database URL is configured.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)));

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(250)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(config.db_connect_retries);

    let pool = Retry::start(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!("Database connection attempt failed: {}", e);
            })
        }
    })
    .await
    .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Resolves when the process receives Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
