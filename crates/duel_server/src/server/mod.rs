//! The WebSocket transport and server orchestration.

pub mod core;
pub mod handlers;

pub use self::core::{DuelServer, ServerConfig};
