//! Command-line argument parsing.
//!
//! Defines the command-line interface for the coordinator using clap.
//! Arguments override the corresponding configuration-file settings.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the word-duel coordinator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path.
    ///
    /// Path to the TOML configuration file. If the file doesn't exist,
    /// a default configuration will be created there.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Server listen address.
    ///
    /// Overrides the listen address from the configuration file.
    /// Format: "IP:PORT" (e.g. "127.0.0.1:8080").
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Word-list file.
    ///
    /// Overrides the lexicon source from the configuration file; one
    /// five-letter word per line. Defaults to the embedded list.
    #[arg(short, long)]
    pub words: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.toml"),
            listen: None,
            words: None,
            debug: false,
        }
    }
}
