//! Configuration file structure and defaults.

use serde::{Deserialize, Serialize};

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub lexicon: LexiconSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Network and session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address the WebSocket listener binds to.
    pub listen_addr: String,

    /// Seconds an abandoned session survives with no connections
    /// before it is reclaimed.
    pub session_grace_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            session_grace_secs: 60,
        }
    }
}

/// Word-list settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconSettings {
    /// Optional word-list file, one five-letter word per line. When
    /// unset the embedded list is used.
    pub words_file: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Base log level ("trace", "debug", "info", "warn", "error").
    pub level: String,

    /// Emit structured JSON logs instead of human-readable output.
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
