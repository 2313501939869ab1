//! Individual client connection state.

use crate::protocol::{ParticipantId, SessionId};
use crate::session::registry::FrameSender;
use std::net::SocketAddr;

/// One connected client.
///
/// Tracks the network address, the outbound frame queue drained by the
/// connection's writer task, and, once the client has joined a session,
/// the seat it occupies.
#[derive(Debug)]
pub struct ClientConnection {
    /// The remote network address of the client.
    pub remote_addr: SocketAddr,

    /// Outbound frames for this connection, delivered in FIFO order.
    pub outbound: FrameSender,

    /// The session seat this connection is bound to (None until a
    /// successful join).
    pub binding: Option<(SessionId, ParticipantId)>,
}

impl ClientConnection {
    /// Creates a new, unbound client connection.
    pub fn new(remote_addr: SocketAddr, outbound: FrameSender) -> Self {
        Self {
            remote_addr,
            outbound,
            binding: None,
        }
    }
}
