//! `ClashServer` builder and server loop.
//!
//! This is the entry point for running a Clash server. It ties together all
//! the layers: transport → protocol → session → round engine.

use std::sync::Arc;

use clash_protocol::{Codec, JsonCodec};
use clash_round::{EngineHandle, RoundConfig, spawn_engine};
use clash_session::SessionManager;
use clash_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{ClashError, ServerConfig};

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Game state is
/// not in here: it lives in the engine actor behind `engine`.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) engine: EngineHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Clash server.
///
/// # Example
///
/// ```rust,ignore
/// use clash::prelude::*;
///
/// let server = ClashServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct ClashServerBuilder {
    config: ServerConfig,
}

impl ClashServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the round configuration.
    pub fn round_config(mut self, round: RoundConfig) -> Self {
        self.config.round = round;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and starts the match engine.
    ///
    /// # Errors
    /// [`ClashError::Transport`] if the address cannot be bound.
    pub async fn build(self) -> Result<ClashServer<JsonCodec>, ClashError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let engine = spawn_engine(self.config.round, self.config.engine_channel_size);

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new()),
            engine,
            codec: JsonCodec,
        });

        Ok(ClashServer { transport, state })
    }
}

impl Default for ClashServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Clash server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ClashServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl ClashServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ClashServerBuilder {
        ClashServerBuilder::new()
    }
}

impl<C: Codec> ClashServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the match engine, for inspection or shutdown.
    pub fn engine(&self) -> EngineHandle {
        self.state.engine.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Accept errors
    /// are logged and the loop continues. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), ClashError> {
        match self.transport.local_addr() {
            Ok(addr) => tracing::info!(%addr, "Clash server listening"),
            Err(_) => tracing::info!("Clash server running"),
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
