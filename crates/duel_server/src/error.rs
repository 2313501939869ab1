//! Error types for the session coordinator.
//!
//! Two layers: [`ServerError`] for infrastructure failures (binding,
//! protocol, internal plumbing) and [`IntentError`] for per-intent
//! rejections that are reported to the originating connection only.
//! Nothing in either layer is allowed to take down the registry or leak
//! into another session.

use duel_core::GuessRejection;
use thiserror::Error;

/// Infrastructure-level failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Networking problems: bind failures, protocol errors, dead sockets.
    #[error("network error: {0}")]
    Network(String),

    /// Internal failures: channel breakage, poisoned state.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Per-intent rejections, scoped to the originating connection.
///
/// Authorization failures (a non-host `start`) and terminal-state
/// intents (guessing after the match ended) are deliberately absent:
/// those are silent no-ops and never become frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    /// The guess failed validation (length, characters, dictionary).
    #[error("{0}")]
    InvalidGuess(#[from] GuessRejection),

    /// Both seats of the session are taken and this is not a reconnect.
    #[error("session is full")]
    SessionFull,

    /// No session with that id exists (never created, or reclaimed).
    #[error("session not found")]
    SessionNotFound,

    /// The intent referenced a participant the session does not know.
    #[error("unknown participant")]
    UnknownParticipant,

    /// The connection sent a session intent before joining a session,
    /// or addressed a session other than the one it joined.
    #[error("not joined to that session")]
    NotJoined,

    /// The supplied display name was empty.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

impl IntentError {
    /// Stable machine-readable code carried in error frames.
    pub fn code(&self) -> &'static str {
        match self {
            IntentError::InvalidGuess(_) => "invalid-guess",
            IntentError::SessionFull => "session-full",
            IntentError::SessionNotFound => "session-not-found",
            IntentError::UnknownParticipant => "unknown-participant",
            IntentError::NotJoined => "not-joined",
            IntentError::EmptyDisplayName => "empty-display-name",
        }
    }
}
