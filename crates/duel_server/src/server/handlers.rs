//! Per-connection WebSocket handling and intent routing.
//!
//! Each accepted socket gets a reader (this function's loop) and a
//! writer task draining the connection's outbound frame queue. The
//! reader parses intents and routes them: joins go through the registry
//! (which may create the session), everything else requires the
//! connection to be bound to a seat first; participant identity is
//! taken from the binding, never from the wire.

use crate::connection::{ConnectionId, ConnectionManager};
use crate::error::{IntentError, ServerError};
use crate::protocol::{Frame, Intent};
use crate::session::registry::{FrameSender, SessionRegistry};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

/// Drives one client connection from WebSocket handshake to teardown.
///
/// On any exit path (clean close, protocol error, dead socket) the
/// connection is unregistered and its seat, if bound, is marked
/// disconnected in the session, which retains the board for reconnect.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    connections: Arc<ConnectionManager>,
    registry: Arc<SessionRegistry>,
) -> Result<(), ServerError> {
    let websocket = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| ServerError::Network(format!("WebSocket handshake failed: {e}")))?;
    let (mut sink, mut source) = websocket.split();

    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Frame>();
    let connection_id = connections.add_connection(addr, outbound.clone()).await;
    info!("🔗 Connection {} opened from {}", connection_id, addr);

    // Writer task: drains the outbound queue in FIFO order, preserving
    // the order in which the session task produced its frames.
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound frame: {e}");
                    continue;
                }
            };
            if sink.send(Message::text(text)).await.is_err() {
                break;
            }
        }
    });

    // Reader loop: one intent at a time, rejections scoped to this
    // connection.
    while let Some(message) = source.next().await {
        match message {
            Ok(Message::Text(text)) => {
                if let Err(err) =
                    route_intent(&text, connection_id, &connections, &registry, &outbound).await
                {
                    connections
                        .send_to_connection(connection_id, Frame::error(&err))
                        .await;
                }
            }
            Ok(Message::Close(_)) => break,
            // Ping/pong are handled by tungstenite; binary is not part
            // of the protocol.
            Ok(_) => {}
            Err(e) => {
                debug!("Connection {} read error: {e}", connection_id);
                break;
            }
        }
    }

    if let Some((session_id, participant_id)) = connections.binding(connection_id).await {
        registry.disconnect(&session_id, participant_id, &outbound);
    }
    connections.remove_connection(connection_id).await;
    writer.abort();
    info!("🔗 Connection {} closed", connection_id);

    Ok(())
}

/// Parses and routes one inbound intent.
///
/// A malformed payload is reported back to the sender and otherwise
/// ignored; it must never disturb session state or other connections.
async fn route_intent(
    text: &str,
    connection_id: ConnectionId,
    connections: &ConnectionManager,
    registry: &SessionRegistry,
    outbound: &FrameSender,
) -> Result<(), IntentError> {
    let intent: Intent = match serde_json::from_str(text) {
        Ok(intent) => intent,
        Err(e) => {
            debug!("Connection {} sent malformed intent: {e}", connection_id);
            connections
                .send_to_connection(
                    connection_id,
                    Frame::Error {
                        code: "malformed-intent".to_string(),
                        message: "could not parse intent".to_string(),
                    },
                )
                .await;
            return Ok(());
        }
    };

    match intent {
        Intent::JoinSession {
            session_id,
            display_name,
            participant_id,
        } => {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(IntentError::EmptyDisplayName);
            }
            let outcome = registry
                .join(&session_id, display_name, participant_id, outbound.clone())
                .await?;
            connections
                .bind_session(connection_id, session_id, outcome.participant_id)
                .await;
            Ok(())
        }

        Intent::StartGame { session_id } => {
            let participant_id = bound_participant(connections, connection_id, &session_id).await?;
            registry.start(&session_id, participant_id)
        }

        Intent::SubmitGuess { session_id, guess } => {
            let participant_id = bound_participant(connections, connection_id, &session_id).await?;
            registry.guess(&session_id, participant_id, guess)
        }

        // Leaving is equivalent to closing the socket: the seat is
        // marked disconnected and the binding is cleared, so further
        // session intents on this connection are rejected.
        Intent::LeaveSession {} => {
            if let Some((session_id, participant_id)) = connections.binding(connection_id).await {
                registry.disconnect(&session_id, participant_id, outbound);
                connections.unbind_session(connection_id).await;
            }
            Ok(())
        }
    }
}

/// Resolves the sender's participant identity from its connection
/// binding. The addressed session must match the bound one.
async fn bound_participant(
    connections: &ConnectionManager,
    connection_id: ConnectionId,
    session_id: &str,
) -> Result<crate::protocol::ParticipantId, IntentError> {
    match connections.binding(connection_id).await {
        Some((bound_session, participant_id)) if bound_session == session_id => Ok(participant_id),
        _ => Err(IntentError::NotJoined),
    }
}
