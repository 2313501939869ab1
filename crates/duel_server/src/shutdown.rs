//! Graceful shutdown handling.
//!
//! Cross-platform signal handling: listens for termination signals and
//! exposes a oneshot receiver that fires when shutdown is requested.

use tokio::sync::oneshot;
use tracing::info;

/// Sets up a shutdown signal handler.
///
/// # Platform support
/// * Unix/Linux: SIGINT (Ctrl+C) and SIGTERM
/// * Windows: Ctrl+C events
pub async fn setup_shutdown_handler() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut tx = Some(tx);

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigint =
                signal(SignalKind::interrupt()).expect("Failed to create SIGINT handler");
            let mut sigterm =
                signal(SignalKind::terminate()).expect("Failed to create SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("SIGINT received - initiating graceful shutdown");
                }
                _ = sigterm.recv() => {
                    info!("SIGTERM received - initiating graceful shutdown");
                }
            }
        }

        #[cfg(windows)]
        {
            use tokio::signal::windows::ctrl_c;

            let mut ctrl_c = ctrl_c().expect("Failed to create Ctrl+C handler");
            ctrl_c.recv().await;
            info!("Ctrl+C received - initiating graceful shutdown");
        }

        if let Some(tx) = tx.take() {
            let _ = tx.send(());
        }
    });

    rx
}
