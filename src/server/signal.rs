// Signal handling module
//
// Supported signals:
// - SIGHUP:  Reload the correction table file
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Register signal handlers and service them on a background task.
///
/// | Signal  | Action                 |
/// |---------|------------------------|
/// | SIGHUP  | Reload correction table |
/// | SIGTERM | Graceful stop          |
/// | SIGINT  | Graceful stop          |
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    logger::log_debug(&format!(
        "[SIGNAL] Handlers registered for pid {} (HUP: reload table, TERM/INT: shutdown)",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    logger::log_info("[SIGNAL] SIGHUP received, reloading correction table");
                    reload(&state).await;
                }
                _ = sigterm.recv() => {
                    logger::log_info("[SIGNAL] SIGTERM received, shutting down");
                    state.request_shutdown();
                    break;
                }
                _ = sigint.recv() => {
                    logger::log_info("[SIGNAL] SIGINT received, shutting down");
                    state.request_shutdown();
                    break;
                }
            }
        }
    });
    Ok(())
}

/// Non-Unix fallback: only Ctrl+C is handled
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("[SIGNAL] Ctrl+C received, shutting down");
            state.request_shutdown();
        }
    });
    Ok(())
}

/// Swap in a freshly loaded table; keep the current one on failure
pub async fn reload(state: &AppState) {
    match state.reload_table().await {
        Ok(true) => {}
        Ok(false) => logger::log_info("[SIGNAL] No table_file configured, nothing to reload"),
        Err(e) => logger::log_error(&format!("[SIGNAL] Reload failed, keeping current table: {e}")),
    }
}
