mod api;
mod middleware;
mod store;

use std::sync::Arc;
use std::time::Duration;

use bilscan_scraper::Scanner;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::store::BatchStore;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = bilscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let scanner = Arc::new(Scanner::from_config(&config)?);
    let store = BatchStore::new(Duration::from_secs(config.session_ttl_secs));
    spawn_purger(store.clone());

    let app = build_app(AppState {
        scanner,
        store,
        default_max_results: config.default_max_results,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "bilscan-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Periodically evicts expired session batches.
fn spawn_purger(store: BatchStore) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let evicted = store.purge_expired().await;
            if evicted > 0 {
                tracing::debug!(evicted, "purged expired session batches");
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
