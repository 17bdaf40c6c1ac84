use std::{net::SocketAddr, sync::Arc};
use study_tracker::{
    catalog::gate_catalog,
    clock::{Clock, SystemClock},
    countdown::{exam_start, Ticker, REFRESH_EVERY},
    router, AppState, Config, FileStore, StorageKey, Store,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let file_store = FileStore::new(&config.data_dir);
    for key in StorageKey::ALL {
        info!(key = key.as_str(), path = %file_store.path_for(key).display(), "storage slot");
    }
    let store: Arc<dyn Store> = Arc::new(file_store);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // dropped on shutdown, which stops the refresh timer
    let ticker = Ticker::spawn(clock.clone(), exam_start(config.exam_date), REFRESH_EVERY);
    let state = AppState::new(
        store,
        clock,
        gate_catalog(),
        config.exam_date,
        ticker.subscribe(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(ticker);
    info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
