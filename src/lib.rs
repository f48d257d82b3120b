pub mod admin; // Admin & finance reports
pub mod api; // HTTP shell
pub mod clinical; // Clinical assistant chat
pub mod config;
pub mod context; // Prompt context serialization
pub mod core_state;
pub mod dashboard;
pub mod models;
pub mod store;
pub mod summarizer;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};

/// Errors that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("State initialization failed: {0}")]
    Core(#[from] CoreError),
    #[error("Async runtime failed to start: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("{0}")]
    Server(String),
}

pub fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    tracing::info!(
        model = %config.model,
        timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );

    // The blocking HTTP client is created and dropped outside the runtime.
    let core = Arc::new(CoreState::from_config(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(Arc::clone(&core), config.bind_addr));
    drop(runtime);

    if let Err(e) = &result {
        tracing::error!("{} stopped with error: {e}", config::APP_NAME);
    }
    result
}

async fn serve(core: Arc<CoreState>, addr: SocketAddr) -> Result<(), StartupError> {
    let mut server = api::start_api_server(core, addr)
        .await
        .map_err(StartupError::Server)?;

    tracing::info!(addr = %server.session.server_addr, "Listening; press Ctrl-C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }

    server.shutdown();
    server.stopped().await;
    Ok(())
}
