use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use bp_api::{create_app, AppState};
use bp_core::repositories::{InMemoryLedgerRepository, InMemoryTokenStore, LedgerRepository, TokenStore};
use bp_core::services::ledger::{LedgerService, LedgerServiceConfig};
use bp_core::services::token::{TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig};
use bp_infra::database::{DatabasePool, MySqlLedgerRepository};
use bp_shared::{AppConfig, LedgerBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().map_err(anyhow::Error::msg)?;

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );
    if !config.logging.timestamp {
        logger.format_timestamp(None);
    }
    logger.init();

    info!(
        "Starting BonusPay API Server ({} environment, {:?} ledger)",
        config.environment, config.ledger.backend
    );

    // Tokens are process-local by design; a restart invalidates all of them
    let token_store = Arc::new(InMemoryTokenStore::new());

    match config.ledger.backend {
        LedgerBackend::Memory => {
            run(&config, token_store, Arc::new(InMemoryLedgerRepository::new())).await
        }
        LedgerBackend::MySql => {
            let pool = DatabasePool::new(&config.database)
                .await
                .context("failed to connect to the ledger database")?;
            pool.bootstrap_schema().await?;

            let repository = Arc::new(
                MySqlLedgerRepository::new(pool.get_pool().clone())
                    .with_lock_wait_timeout(Duration::from_millis(config.ledger.lock_timeout_ms)),
            );
            let result = run(&config, token_store, repository).await;

            pool.close().await;
            result
        }
    }
}

/// Wires the services, runs the HTTP server and stops the cleanup task once
/// the server has exited
async fn run<S, R>(config: &AppConfig, token_store: Arc<S>, repository: Arc<R>) -> anyhow::Result<()>
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    let token_service = Arc::new(TokenService::new(
        token_store.clone(),
        TokenServiceConfig::from(&config.token),
    )?);
    let ledger_service = Arc::new(LedgerService::new(
        repository,
        LedgerServiceConfig::from(&config.ledger),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = Arc::new(TokenCleanupService::new(
        token_store,
        TokenCleanupConfig::from(&config.token),
    ));
    let cleanup_handle = cleanup.start_background_task(shutdown_rx);

    let state = web::Data::new(AppState::new(token_service, ledger_service));
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    let result = server.bind(&bind_address)?.run().await;

    info!("HTTP server stopped, shutting down background tasks");
    // No receiver left just means the cleanup task already exited
    let _ = shutdown_tx.send(true);
    if let Some(handle) = cleanup_handle {
        if let Err(e) = handle.await {
            error!("Token cleanup task ended abnormally: {}", e);
        }
    }

    result.map_err(Into::into)
}
