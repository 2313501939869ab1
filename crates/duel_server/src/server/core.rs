//! Core server implementation.
//!
//! `DuelServer` wires the pieces together: the TCP accept loop, the
//! connection manager, and the session registry. It carries no game
//! logic of its own: sessions own their state, connections own their
//! sockets, and this type owns startup and shutdown.

use crate::connection::ConnectionManager;
use crate::error::ServerError;
use crate::server::handlers::handle_connection;
use crate::session::registry::SessionRegistry;
use duel_core::Lexicon;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Runtime configuration for the coordinator.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_address: SocketAddr,

    /// How long an abandoned session survives with no connections
    /// before the registry reclaims it.
    pub session_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".parse().expect("valid default address"),
            session_grace: Duration::from_secs(60),
        }
    }
}

/// The multiplayer session coordinator.
pub struct DuelServer {
    config: ServerConfig,
    connections: Arc<ConnectionManager>,
    registry: Arc<SessionRegistry>,
    shutdown_sender: broadcast::Sender<()>,
}

impl DuelServer {
    /// Creates a server around the given lexicon. The lexicon is loaded
    /// once and shared read-only across all sessions.
    pub fn new(config: ServerConfig, lexicon: Arc<Lexicon>) -> Self {
        let registry = Arc::new(SessionRegistry::new(lexicon, config.session_grace));
        let (shutdown_sender, _) = broadcast::channel(1);
        Self {
            config,
            connections: Arc::new(ConnectionManager::new()),
            registry,
            shutdown_sender,
        }
    }

    /// Binds the listener and accepts connections until shutdown.
    ///
    /// Every accepted socket gets its own handler task; a failed
    /// handshake or a misbehaving client only ever affects that one
    /// connection.
    pub async fn start(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| ServerError::Network(format!("Bind failed: {e}")))?;
        info!("🚀 Listening on {}", self.config.bind_address);

        let mut shutdown_receiver = self.shutdown_sender.subscribe();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            let connections = self.connections.clone();
                            let registry = self.registry.clone();
                            tokio::spawn(async move {
                                if let Err(e) =
                                    handle_connection(stream, addr, connections, registry).await
                                {
                                    error!("Connection error: {e}");
                                }
                            });
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {e}");
                        }
                    }
                }
                _ = shutdown_receiver.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Server stopped");
        Ok(())
    }

    /// Signals the accept loop to stop.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        info!("🛑 Shutting down server...");
        let _ = self.shutdown_sender.send(());
        Ok(())
    }

    /// The session registry, exposed for tests and embedding.
    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    /// The connection manager, exposed for tests and embedding.
    pub fn connections(&self) -> Arc<ConnectionManager> {
        self.connections.clone()
    }
}
