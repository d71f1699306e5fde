use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use cachette_api::auth::{AppState, AppStateInner};
use cachette_api::session::SessionStore;
use cachette_store::StoreBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachette=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("CACHETTE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CACHETTE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let backend: StoreBackend = std::env::var("CACHETTE_STORE")
        .unwrap_or_else(|_| "memory".into())
        .parse()?;
    let db_path = PathBuf::from(
        std::env::var("CACHETTE_DB_PATH").unwrap_or_else(|_| "cachette.db".into()),
    );
    let seed = std::env::var("CACHETTE_SEED")
        .map(|v| v != "false" && v != "0")
        .unwrap_or(true);

    // Init store
    let store = cachette_store::open(backend, &db_path)?;
    if seed {
        cachette_store::seed::run(store.as_ref())?;
    }

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        store,
        sessions: SessionStore::new(),
    });

    let app = cachette_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Cachette server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
