//! Session registry and per-session command serialization.
//!
//! The registry is the sharded-by-session-id concurrency boundary: a
//! `DashMap` of session id → handle, where each handle feeds an
//! unbounded command queue drained by one dedicated tokio task that owns
//! the [`Session`] value outright. Intents from both participants'
//! connections funnel into that queue and are applied in arrival order,
//! which is the total order the tie-break rule depends on. Different
//! sessions share nothing mutable and run fully in parallel.

use crate::error::IntentError;
use crate::protocol::{Frame, ParticipantId, SessionId};
use crate::session::{JoinOutcome, Session};
use dashmap::DashMap;
use duel_core::Lexicon;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Length of minted session id tokens.
const SESSION_ID_LEN: usize = 16;

/// Outbound frame queue for one connection. The writer task on the
/// other end drains it to the WebSocket in FIFO order, which preserves
/// snapshot ordering per connection.
pub type FrameSender = mpsc::UnboundedSender<Frame>;

/// Commands a session task accepts. One queue per session; processing
/// order is arrival order.
enum SessionCommand {
    Join {
        display_name: String,
        reconnect: Option<ParticipantId>,
        outbound: FrameSender,
        reply: oneshot::Sender<Result<JoinOutcome, IntentError>>,
    },
    Start {
        participant: ParticipantId,
    },
    Guess {
        participant: ParticipantId,
        guess: String,
    },
    Disconnect {
        participant: ParticipantId,
        outbound: FrameSender,
    },
}

/// Handle to a running session task.
#[derive(Clone)]
struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

/// Server-resident map of session id → session task.
///
/// Owns creation, routing, and teardown. Sessions are created lazily on
/// the first join for an unknown id and reclaimed after all connections
/// have been gone for the grace window.
pub struct SessionRegistry {
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
    lexicon: Arc<Lexicon>,
    grace: Duration,
}

impl SessionRegistry {
    pub fn new(lexicon: Arc<Lexicon>, grace: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            lexicon,
            grace,
        }
    }

    /// Mints a fresh opaque session id, suitable for a shareable URL.
    pub fn mint_session_id(&self) -> SessionId {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Routes a join intent, creating the session (with a freshly drawn
    /// target word) when the id is unknown.
    ///
    /// On success the joiner's outbound queue is bound inside the
    /// session task, which also emits the `joined` frame and the first
    /// snapshot broadcast.
    pub async fn join(
        &self,
        session_id: &SessionId,
        display_name: String,
        reconnect: Option<ParticipantId>,
        outbound: FrameSender,
    ) -> Result<JoinOutcome, IntentError> {
        let handle = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| self.spawn_session(session_id.clone()))
            .clone();

        let (reply, response) = oneshot::channel();
        let command = SessionCommand::Join {
            display_name,
            reconnect,
            outbound,
            reply,
        };
        if handle.commands.send(command).is_err() {
            // The task won the race against reclamation; the id is gone.
            self.sessions
                .remove_if(session_id, |_, h| h.commands.is_closed());
            return Err(IntentError::SessionNotFound);
        }

        response
            .await
            .map_err(|_| IntentError::SessionNotFound)?
    }

    /// Routes a start intent to the addressed session.
    pub fn start(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
    ) -> Result<(), IntentError> {
        self.send(session_id, SessionCommand::Start { participant })
    }

    /// Routes a guess intent to the addressed session.
    pub fn guess(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
        guess: String,
    ) -> Result<(), IntentError> {
        self.send(session_id, SessionCommand::Guess { participant, guess })
    }

    /// Marks a participant's connection gone. The closing transport's
    /// own sender identifies it: a reconnect replaces the binding, and a
    /// teardown for the replaced socket must not touch the new one.
    /// Missing sessions are fine here; disconnects race reclamation by
    /// design.
    pub fn disconnect(
        &self,
        session_id: &SessionId,
        participant: ParticipantId,
        outbound: &FrameSender,
    ) {
        let _ = self.send(
            session_id,
            SessionCommand::Disconnect {
                participant,
                outbound: outbound.clone(),
            },
        );
    }

    fn send(&self, session_id: &SessionId, command: SessionCommand) -> Result<(), IntentError> {
        let handle = self
            .sessions
            .get(session_id)
            .ok_or(IntentError::SessionNotFound)?;
        handle
            .commands
            .send(command)
            .map_err(|_| IntentError::SessionNotFound)
    }

    /// Spawns the task that owns one session for its whole lifetime.
    fn spawn_session(&self, session_id: SessionId) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let target = self.lexicon.pick_target().to_string();
        let session = Session::new(session_id.clone(), target);
        let lexicon = self.lexicon.clone();
        let sessions = self.sessions.clone();
        let grace = self.grace;

        info!("🆕 Session {} created", session_id);
        tokio::spawn(run_session(session, rx, lexicon, sessions, grace));

        SessionHandle { commands: tx }
    }
}

/// The per-session task: drains the command queue, applies intents to
/// the exclusively-owned `Session`, and fans snapshots out to every
/// bound connection. Exits (and removes itself from the registry) once
/// all connections have been closed for the grace window.
async fn run_session(
    mut session: Session,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    lexicon: Arc<Lexicon>,
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
    grace: Duration,
) {
    let mut bindings: HashMap<ParticipantId, FrameSender> = HashMap::new();
    let mut any_connected = true;

    loop {
        let command = if any_connected {
            commands.recv().await
        } else {
            tokio::select! {
                command = commands.recv() => command,
                _ = tokio::time::sleep(grace) => {
                    info!("🗑️ Session {} reclaimed after grace period", session.id());
                    break;
                }
            }
        };
        let Some(command) = command else {
            break;
        };

        match command {
            SessionCommand::Join {
                display_name,
                reconnect,
                outbound,
                reply,
            } => {
                let result = session.join(&display_name, reconnect);
                if let Ok(outcome) = &result {
                    bindings.insert(outcome.participant_id, outbound.clone());
                    any_connected = true;
                    let _ = outbound.send(Frame::Joined {
                        session_id: session.id().clone(),
                        participant_id: outcome.participant_id,
                    });
                    info!(
                        "👋 {} {} session {}",
                        display_name,
                        if outcome.reconnected { "rejoined" } else { "joined" },
                        session.id()
                    );
                    broadcast_snapshot(&session, &bindings);
                }
                let _ = reply.send(result);
            }

            SessionCommand::Start { participant } => {
                if session.start(participant) {
                    info!("🚦 Session {} started", session.id());
                    broadcast(&bindings, Frame::GameStarted {});
                    broadcast_snapshot(&session, &bindings);
                } else {
                    // Unauthorized or premature start: silent no-op.
                    debug!(
                        "Ignored start for session {} from {}",
                        session.id(),
                        participant
                    );
                }
            }

            SessionCommand::Guess { participant, guess } => {
                match session.submit_guess(participant, &guess, &lexicon) {
                    Ok(Some(applied)) => {
                        broadcast_snapshot(&session, &bindings);
                        if let Some((winner, reason)) = applied.match_end {
                            info!(
                                "🏁 Session {} ended: {:?} ({:?})",
                                session.id(),
                                winner,
                                reason
                            );
                            broadcast(&bindings, Frame::GameEnded { winner, reason });
                        }
                    }
                    Ok(None) => {
                        debug!("Ignored guess in session {}", session.id());
                    }
                    Err(err) => {
                        // Rejections go to the originator only, never
                        // fanned out.
                        if let Some(sender) = bindings.get(&participant) {
                            let _ = sender.send(Frame::error(&err));
                        }
                    }
                }
            }

            SessionCommand::Disconnect { participant, outbound } => {
                // Only the currently bound transport may disconnect its
                // seat; the teardown of a socket that was replaced by a
                // reconnect is stale and must not unbind the new one.
                let current = bindings
                    .get(&participant)
                    .is_some_and(|sender| sender.same_channel(&outbound));
                if !current {
                    debug!(
                        "Ignored stale disconnect for {} in session {}",
                        participant,
                        session.id()
                    );
                    continue;
                }
                bindings.remove(&participant);
                any_connected = session.disconnect(participant);
                debug!(
                    "🔌 {} disconnected from session {} ({} still connected)",
                    participant,
                    session.id(),
                    bindings.len()
                );
                broadcast_snapshot(&session, &bindings);
            }
        }
    }

    sessions.remove(session.id());
    debug!("Session {} task exited", session.id());
}

fn broadcast(bindings: &HashMap<ParticipantId, FrameSender>, frame: Frame) {
    for (participant, sender) in bindings {
        if sender.send(frame.clone()).is_err() {
            warn!("⚠️ Dropped frame for disconnected participant {participant}");
        }
    }
}

fn broadcast_snapshot(session: &Session, bindings: &HashMap<ParticipantId, FrameSender>) {
    if let Some(snapshot) = session.snapshot() {
        broadcast(bindings, Frame::SessionUpdate(snapshot));
    }
}
