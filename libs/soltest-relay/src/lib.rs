//! Local relay between the browser extension and the tester
//!
//! The extension POSTs the scraped question to `/` and `soltest test` GETs it
//! back. The payload is opaque here; only the tester decodes it.

pub mod handlers;
pub mod routes;
pub mod store;

use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::routes;
pub use store::QuestionStore;

/// Bind `addr` and serve the relay until `shutdown` resolves
pub async fn serve<F>(addr: SocketAddr, store: QuestionStore, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    serve_on(listener, store, shutdown).await
}

/// Serve the relay on an already bound listener
pub async fn serve_on<F>(listener: TcpListener, store: QuestionStore, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Relay listening on {}", addr);
    }
    info!("Waiting for questions");

    axum::serve(listener, routes(store))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Relay server error")?;

    info!("Relay stopped");
    Ok(())
}
