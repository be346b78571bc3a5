//! Downtime predictor HTTP server
//!
//! Exposes the upload → train → predict workflow over a small REST API.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::{MessageResponse, PredictResponse, TrainResponse, UploadResponse};
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// File the trained model is persisted to and reloaded from
    pub model_path: PathBuf,
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("model.bin")),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100 * 1024 * 1024), // 100MB
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let state = Arc::new(AppState::new(config.clone()));
    if state.store.exists() {
        info!(path = %config.model_path.display(), "Found persisted model, will load on first prediction");
    } else {
        warn!(path = %config.model_path.display(), "No persisted model yet, train one before predicting");
    }

    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        model_path = %config.model_path.display(),
        max_upload_size_mb = config.max_upload_size / 1024 / 1024,
        started_at = %start_time.to_rfc3339(),
        "Downtime predictor starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(uptime_secs = uptime.num_seconds(), "Shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
