mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use std::sync::Arc;

use anyhow::Context;
use burrow_core::Repository;
use burrow_generator::RandomGenerator;
use burrow_redirector::{CachedRepository, MokaUrlCache, RedirectorService};
use burrow_shortener::{AllocatorSettings, ShortenerService};
use burrow_storage::{InMemoryRepository, SqliteRepository, SqliteSettings, TimeoutRepository};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::App;
use crate::cli::{Cli, StorageBackendArg};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    burrow_telemetry::init_tracing(config.log_format)
        .context("failed to initialize tracing")?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        code_length = config.code_length,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            let repository =
                TimeoutRepository::new(InMemoryRepository::new(), config.store_timeout());
            run_server(&config, repository).await?;
        }
        StorageBackendArg::Sqlite => {
            let settings = SqliteSettings::builder()
                .url(config.sqlite_url.clone())
                .acquire_timeout(config.store_timeout())
                .build();
            let sqlite = SqliteRepository::connect(&settings)
                .await
                .with_context(|| format!("failed to open {}", config.sqlite_url))?;

            let repository = TimeoutRepository::new(sqlite.clone(), config.store_timeout());
            let served = run_server(&config, repository).await;

            sqlite.close().await;
            info!("sqlite store closed");
            served?;
        }
    }

    Ok(())
}

async fn run_server<R: Repository>(config: &Cli, repository: R) -> anyhow::Result<()> {
    let repository = Arc::new(repository);

    let settings = AllocatorSettings::builder()
        .max_attempts(config.max_attempts)
        .reserved_codes(App::RESERVED_PATHS)
        .build();
    let shortener = ShortenerService::with_settings(
        Arc::clone(&repository),
        RandomGenerator::new(config.code_length()),
        settings,
    );
    let cache: MokaUrlCache = MokaUrlCache::builder()
        .max_capacity(config.cache_capacity)
        .time_to_idle(config.cache_idle())
        .build()
        .into();
    let redirector = RedirectorService::with_code_length(
        CachedRepository::new(repository, cache),
        config.code_length(),
    );

    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        config.base_url.clone(),
    );

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server failed")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
