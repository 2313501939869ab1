//! # duel_server - Word-Duel Session Coordinator
//!
//! The server-authoritative half of the word-duel game: it pairs two
//! independent clients over one puzzle word, applies their guesses in a
//! single per-session order, and broadcasts consistent snapshots so both
//! reach the same verdict about who won.
//!
//! ## Architecture
//!
//! * **Protocol** - serde-tagged JSON intents and frames over WebSocket
//!   text messages
//! * **Session** - the state machine owning both boards and the match
//!   verdict; participants only submit intents
//! * **Registry** - DashMap of session id → command queue, one tokio
//!   task per session so intents are applied in one total order
//! * **Connection layer** - connection ids, outbound frame queues, and
//!   the binding from a connection to its session seat
//! * **Transport** - tokio-tungstenite accept loop; a reader and writer
//!   task per connection
//!
//! ## Consistency model
//!
//! All intents addressed to a session are serialized through its command
//! queue, so the first winning guess is authoritative even when both
//! clients believe they guessed "simultaneously". Broadcasts ride
//! per-connection FIFO queues, so no client ever observes a later
//! snapshot before an earlier one. Distinct sessions share no mutable
//! state and proceed fully in parallel.
//!
//! ## Error handling
//!
//! Per-intent rejections ([`IntentError`]) are reported only to the
//! originating connection; authorization failures and intents against a
//! finished match are silent no-ops. Infrastructure failures
//! ([`ServerError`]) are scoped to one connection or to startup; a
//! malformed intent can never corrupt another session or take down the
//! registry.

pub use error::{IntentError, ServerError};
pub use server::{DuelServer, ServerConfig};

pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod session;
pub mod shutdown;
