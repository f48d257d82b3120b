//! API server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::api_router;
use crate::core_state::CoreState;

/// Metadata for a running API server.
#[derive(Debug, Clone, Serialize)]
pub struct ApiSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Signal a graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish (after [`Self::shutdown`]).
    pub async fn stopped(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

/// Bind `addr` and serve the API router in a background task.
///
/// Port 0 picks an ephemeral port; the bound address is in the returned
/// session metadata.
pub async fn start_api_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = api_router(core);

    let session = ApiSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::store::DataStore;
    use crate::summarizer::{MockGenerator, SummarizerConfig};

    fn test_core() -> Arc<CoreState> {
        Arc::new(CoreState::with_backend(
            DataStore::demo().unwrap(),
            SummarizerConfig::new(None, "test-model"),
            Arc::new(MockGenerator::new("x")),
        ))
    }

    fn localhost() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_api_server(test_core(), localhost())
            .await
            .expect("server should start");

        assert!(!server.session.session_id.is_empty());
        assert!(server.session.port > 0);

        let url = format!("http://127.0.0.1:{}/api/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["ai_configured"], false);

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let mut server = start_api_server(test_core(), localhost())
            .await
            .expect("server should start");

        let url = format!("http://127.0.0.1:{}/nonexistent", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn binding_taken_port_fails() {
        let mut first = start_api_server(test_core(), localhost()).await.unwrap();
        let taken: SocketAddr = first.session.server_addr.parse().unwrap();

        let err = start_api_server(test_core(), taken).await.err().unwrap();
        assert!(err.contains("Failed to bind"));

        first.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_api_server(test_core(), localhost()).await.unwrap();
        server.shutdown();
        server.shutdown();
        server.stopped().await;
        server.stopped().await;
    }
}
