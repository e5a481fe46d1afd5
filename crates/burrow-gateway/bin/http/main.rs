mod cli;

use crate::cli::{LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use burrow_core::{Repository, Shortener};
use burrow_gateway::{App, AppState};
use burrow_generator::{RandomGenerator, RandomGeneratorSettings};
use burrow_shortener::{ShortenerService, ShortenerSettings};
use burrow_storage::{InMemoryRepository, JsonFileRepository};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    let base_url = config.public_base_url();
    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %base_url,
        storage_backend = %config.storage,
        "starting burrow"
    );

    let shortener = match config.storage {
        StorageBackendArg::File => {
            let repository = JsonFileRepository::load(&config.data_file)
                .await
                .with_context(|| {
                    format!("failed to load mappings from {}", config.data_file.display())
                })?;
            build_shortener(&config, repository)?
        }
        StorageBackendArg::InMemory => {
            warn!("in-memory storage selected, mappings are lost on exit");
            build_shortener(&config, InMemoryRepository::new())?
        }
    };

    let app = App::router(AppState::new(shortener, base_url));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

fn build_shortener<R: Repository>(
    config: &CLI,
    repository: R,
) -> anyhow::Result<Arc<dyn Shortener>> {
    let generator = RandomGenerator::new(
        RandomGeneratorSettings::builder()
            .length(usize::from(config.code_length))
            .build(),
    )
    .context("invalid code generator settings")?;
    let settings = ShortenerSettings::builder()
        .max_attempts(config.max_attempts)
        .build();

    Ok(Arc::new(ShortenerService::with_settings(
        repository, generator, settings,
    )))
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Text => subscriber.init(),
        LogFormatArg::Json => subscriber.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
