pub mod ingest;
pub mod reporting;

use axum::Router;
use log::info;
use serde::Serialize;
use std::error::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Binds `addr` and serves `app` until `shutdown` is cancelled.
pub async fn serve(
    addr: &str,
    app: Router,
    shutdown: CancellationToken
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        format!("Failed to bind HTTP server to {}: {}", addr, e)
    })?;
    info!("HTTP server listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    info!("HTTP server on {} stopped", addr);
    Ok(())
}
