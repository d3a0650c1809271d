//! FlowSketch render server binary.

use flowsketch_server::{ServerConfig, router};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowsketch_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    info!("FlowSketch render server listening on {}", config.addr);
    info!("Render endpoint: http://{}/json-to-svg", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, router()).await
}
