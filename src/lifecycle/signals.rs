//! OS signal handling.

use std::future::Future;
use std::io;

use crate::lifecycle::shutdown::Shutdown;

/// Trigger `shutdown` on the first Ctrl-C (or SIGTERM on unix).
pub fn spawn_signal_listener(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown signal received, cancelling in-flight checks");
        shutdown.trigger();
    })
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler");
            ctrl_c_or_pending(tokio::signal::ctrl_c()).await;
            return;
        }
    };

    tokio::select! {
        _ = ctrl_c_or_pending(tokio::signal::ctrl_c()) => {}
        Some(()) = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c_or_pending(tokio::signal::ctrl_c()).await;
}

/// Resolve when `ctrl_c` reports a signal. A handler that could not be
/// installed never resolves, so it cannot be mistaken for a shutdown request.
async fn ctrl_c_or_pending<F>(ctrl_c: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = ctrl_c.await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C, shutdown signal disabled");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn test_failed_handler_never_signals() {
        let failing = async { Err(io::Error::new(io::ErrorKind::Other, "no handler")) };
        let waited = time::timeout(Duration::from_secs(60), ctrl_c_or_pending(failing)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_delivered_signal_resolves() {
        ctrl_c_or_pending(async { Ok(()) }).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_handler_does_not_trigger_shutdown() {
        let shutdown = Shutdown::new();
        let token = shutdown.subscribe();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            ctrl_c_or_pending(async { Err(io::Error::new(io::ErrorKind::Other, "no handler")) })
                .await;
            trigger.trigger();
        });

        time::sleep(Duration::from_secs(60)).await;
        assert!(!token.is_cancelled());
    }
}
