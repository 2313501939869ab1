//! Connection tracking and lookup.

use super::{ClientConnection, ConnectionId};
use crate::protocol::{Frame, ParticipantId, SessionId};
use crate::session::registry::FrameSender;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Thread-safe registry of live connections.
///
/// Connection state lives behind an async `RwLock`; lookups are reads,
/// lifecycle changes are writes. Per-session serialization is not this
/// type's job; that happens in the session registry.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, ClientConnection>>,
    next_id: AtomicUsize,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and assigns its id.
    pub async fn add_connection(&self, remote_addr: SocketAddr, outbound: FrameSender) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections
            .write()
            .await
            .insert(id, ClientConnection::new(remote_addr, outbound));
        debug!("Connection {} registered from {}", id, remote_addr);
        id
    }

    /// Removes a connection, returning its last known state.
    pub async fn remove_connection(&self, id: ConnectionId) -> Option<ClientConnection> {
        let removed = self.connections.write().await.remove(&id);
        if let Some(connection) = &removed {
            debug!("Connection {} from {} removed", id, connection.remote_addr);
        }
        removed
    }

    /// Records which session seat a connection occupies after a
    /// successful join.
    pub async fn bind_session(
        &self,
        id: ConnectionId,
        session_id: SessionId,
        participant_id: ParticipantId,
    ) {
        if let Some(connection) = self.connections.write().await.get_mut(&id) {
            connection.binding = Some((session_id, participant_id));
        }
    }

    /// Clears a connection's session binding on explicit leave.
    pub async fn unbind_session(&self, id: ConnectionId) {
        if let Some(connection) = self.connections.write().await.get_mut(&id) {
            connection.binding = None;
        }
    }

    /// The session seat a connection is bound to, if any.
    pub async fn binding(&self, id: ConnectionId) -> Option<(SessionId, ParticipantId)> {
        self.connections
            .read()
            .await
            .get(&id)
            .and_then(|c| c.binding.clone())
    }

    /// Queues a frame for one connection. Returns false when the
    /// connection is gone or its writer has shut down.
    pub async fn send_to_connection(&self, id: ConnectionId, frame: Frame) -> bool {
        match self.connections.read().await.get(&id) {
            Some(connection) => connection.outbound.send(frame).is_ok(),
            None => false,
        }
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}
