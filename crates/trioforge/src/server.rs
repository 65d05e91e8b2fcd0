//! `TrioforgeServer` builder and the accept loop.
//!
//! Ties the layers together: transport → protocol → session → room,
//! plus the HTTP side-channel and the background sweep that evicts
//! expired rooms and stale seat bindings.

use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use trioforge_protocol::JsonCodec;
use trioforge_room::{GameConfig, LobbyRegistry};
use trioforge_session::{SessionConfig, SessionManager};
use trioforge_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{http, TrioforgeError};

/// Shared server state passed to every connection handler task.
pub(crate) struct ServerState {
    pub(crate) lobby: Mutex<LobbyRegistry>,
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) codec: JsonCodec,
    pub(crate) config: GameConfig,
    pub(crate) started_at: Instant,
}

/// Builder for configuring and starting a Trioforge server.
///
/// # Example
///
/// ```rust,no_run
/// use trioforge::prelude::*;
///
/// # async fn run() -> Result<(), TrioforgeError> {
/// let server = TrioforgeServer::builder()
///     .bind("0.0.0.0:8080")
///     .http("0.0.0.0:8081")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct TrioforgeServerBuilder {
    ws_addr: String,
    http_addr: Option<String>,
    config: GameConfig,
}

impl TrioforgeServerBuilder {
    pub fn new() -> Self {
        Self {
            ws_addr: "127.0.0.1:8080".to_string(),
            http_addr: None,
            config: GameConfig::default(),
        }
    }

    /// Sets the WebSocket bind address.
    pub fn bind(mut self, addr: &str) -> Self {
        self.ws_addr = addr.to_string();
        self
    }

    /// Enables the HTTP side-channel (`/health`, `/rooms`) on `addr`.
    pub fn http(mut self, addr: &str) -> Self {
        self.http_addr = Some(addr.to_string());
        self
    }

    /// Overrides the game configuration.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listeners and builds the server.
    pub async fn build(self) -> Result<TrioforgeServer, TrioforgeError> {
        let transport = WebSocketTransport::bind(&self.ws_addr).await?;
        let http_listener = match &self.http_addr {
            Some(addr) => Some(TcpListener::bind(addr).await?),
            None => None,
        };

        let session_config = SessionConfig { reconnect_grace: self.config.reconnect_grace };
        let state = Arc::new(ServerState {
            lobby: Mutex::new(LobbyRegistry::new(self.config.clone())),
            sessions: Mutex::new(SessionManager::new(session_config)),
            codec: JsonCodec,
            config: self.config,
            started_at: Instant::now(),
        });

        Ok(TrioforgeServer { transport, http_listener, state })
    }
}

impl Default for TrioforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Trioforge server. Call [`run`](Self::run) to start
/// accepting connections.
pub struct TrioforgeServer {
    transport: WebSocketTransport,
    http_listener: Option<TcpListener>,
    state: Arc<ServerState>,
}

impl TrioforgeServer {
    pub fn builder() -> TrioforgeServerBuilder {
        TrioforgeServerBuilder::new()
    }

    /// The WebSocket address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The HTTP side-channel address, if enabled.
    pub fn http_addr(&self) -> Option<std::net::SocketAddr> {
        self.http_listener
            .as_ref()
            .and_then(|l| l.local_addr().ok())
    }

    /// Runs the accept loop until the process terminates.
    ///
    /// Spawns the background sweep and (when configured) the HTTP
    /// side-channel, then accepts and handles connections forever.
    pub async fn run(mut self) -> Result<(), TrioforgeError> {
        tracing::info!("Trioforge server running");

        spawn_sweeper(Arc::clone(&self.state));

        if let Some(listener) = self.http_listener.take() {
            let router = http::router(Arc::clone(&self.state));
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, router).await {
                    tracing::error!(error = %e, "http side-channel stopped");
                }
            });
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Periodic eviction of expired rooms and stale seat bindings.
fn spawn_sweeper(state: Arc<ServerState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(state.config.cleanup_sweep);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so the sweep
        // runs on the configured cadence.
        interval.tick().await;

        loop {
            interval.tick().await;

            let evicted = state.lobby.lock().await.sweep().await;
            let mut sessions = state.sessions.lock().await;
            for room in &evicted {
                sessions.release_room(*room);
            }
            let expired = sessions.expire_stale();
            sessions.cleanup_expired();

            if !evicted.is_empty() || !expired.is_empty() {
                tracing::info!(
                    rooms = evicted.len(),
                    bindings = expired.len(),
                    "sweep evicted stale state"
                );
            }
        }
    });
}
