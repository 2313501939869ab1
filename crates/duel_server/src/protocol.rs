//! Wire protocol between clients and the session coordinator.
//!
//! Messages travel as JSON text frames over the WebSocket transport,
//! tagged with an `event` field and carrying their payload under `data`.
//! Event names match the original client vocabulary (`join-session`,
//! `start-game`, `session-update`, ...), field names are camelCase.

use crate::error::IntentError;
use duel_core::Board;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, URL-safe session identifier carried in a shareable link.
pub type SessionId = String;

/// Identifier for one participant within a session.
///
/// Assigned by the coordinator on first join; a reconnecting client
/// presents it to reclaim its seat. Never derived from board contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// Somebody guessed the word; `winner_name` names them.
    Solved,
    /// Every board finished without a win.
    EveryoneLost,
}

/// Client-originated intents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Intent {
    /// Join (or create) a session. `participant_id` is only set when
    /// reconnecting to reclaim an existing seat.
    JoinSession {
        session_id: SessionId,
        display_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        participant_id: Option<ParticipantId>,
    },
    /// Host-only request to start the match.
    StartGame { session_id: SessionId },
    /// Submit a guess for the sender's own board.
    SubmitGuess { session_id: SessionId, guess: String },
    /// Explicit leave; equivalent to closing the socket.
    LeaveSession {},
}

/// Coordinator-originated frames.
///
/// `SessionUpdate`, `GameStarted` and `GameEnded` fan out to every
/// participant; `Joined` and `Error` go to a single connection only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Frame {
    /// Direct reply to a successful join carrying the seat's identity.
    Joined {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
    /// Full authoritative snapshot after every accepted intent.
    SessionUpdate(SessionSnapshot),
    /// The host started the match.
    GameStarted {},
    /// The match ended.
    GameEnded {
        winner: Option<String>,
        reason: EndReason,
    },
    /// Rejection scoped to the originating connection.
    Error { code: String, message: String },
}

impl Frame {
    /// Builds an error frame from an intent rejection.
    pub fn error(err: &IntentError) -> Self {
        Frame::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// One participant as seen in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub display_name: String,
    pub board: Board,
    pub has_won: bool,
    pub connected: bool,
}

/// The full, consistent session state broadcast to all participants.
///
/// Assembled atomically by the session task after each accepted intent;
/// clients never observe a partial update, and per-connection queues
/// preserve the order in which snapshots were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub host_id: ParticipantId,
    pub participants: Vec<ParticipantSnapshot>,
    pub started: bool,
    pub ended: bool,
    pub winner_name: Option<String>,
    pub end_reason: Option<EndReason>,
}
