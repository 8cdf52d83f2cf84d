// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long to wait for in-flight connections after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Accept loop. Returns once `state.request_shutdown()` has been called
/// and in-flight connections have finished (or `DRAIN_TIMEOUT` passed).
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        let shutdown = state.shutdown.notified();
        tokio::pin!(shutdown);
        // Register before checking the flag so a concurrent notify is not lost
        shutdown.as_mut().enable();
        if state.is_shutting_down() {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => break,
        }
    }

    logger::log_info(&format!(
        "[Shutdown] Listener closed, {} connection(s) in flight",
        active_connections.load(Ordering::SeqCst)
    ));
    drop(listener);
    drain(&active_connections).await;
    Ok(())
}

async fn drain(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "[Shutdown] Gave up waiting on {} connection(s)",
                active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    logger::log_info("[Shutdown] All connections closed");
}
