//! Server binary: bind addresses come from the environment, defaults
//! suit local development.

use trioforge::prelude::*;

#[tokio::main]
async fn main() -> Result<(), TrioforgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let ws_addr =
        std::env::var("TRIOFORGE_WS_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let http_addr =
        std::env::var("TRIOFORGE_HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

    let server = TrioforgeServer::builder()
        .bind(&ws_addr)
        .http(&http_addr)
        .build()
        .await?;

    tracing::info!(ws = %ws_addr, http = %http_addr, "listening");
    server.run().await
}
