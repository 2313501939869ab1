//! Connection management for client connections.
//!
//! This module handles the lifecycle of client connections: id
//! assignment, outbound frame queues, and the binding between a
//! connection and the session seat it joined.

pub mod client;
pub mod manager;

pub use client::ClientConnection;
pub use manager::ConnectionManager;

/// Type alias for connection identifiers.
///
/// Connection ids are unique per transport connection for the lifetime
/// of the process; a reconnecting client gets a new one.
pub type ConnectionId = usize;
