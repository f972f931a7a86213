//! Shutdown signalling.
//!
//! Raw mode turns Ctrl+C into an ordinary input byte, so the only signals left
//! to watch are the termination ones. They cancel the shared shutdown token,
//! which every activity of the shell selects on.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

/// Cancels `shutdown` when SIGTERM or SIGHUP arrives.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
/// Returns an error if the signal handlers cannot be registered.
#[cfg(unix)]
pub fn spawn_signal_listener(shutdown: CancellationToken) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate()).context("register SIGTERM handler")?;
    let mut hup = signal(SignalKind::hangup()).context("register SIGHUP handler")?;
    tokio::spawn(async move {
        tokio::select! {
            _ = term.recv() => tracing::info!("SIGTERM received"),
            _ = hup.recv() => tracing::info!("SIGHUP received"),
            () = shutdown.cancelled() => return,
        }
        shutdown.cancel();
    });
    Ok(())
}

/// Cancels `shutdown` on Ctrl+C delivered as a console event.
///
/// # Errors
/// Never fails on this platform; the signature matches the unix variant.
#[cfg(not(unix))]
pub fn spawn_signal_listener(shutdown: CancellationToken) -> Result<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if res.is_ok() {
                    shutdown.cancel();
                }
            }
            () = shutdown.cancelled() => {}
        }
    });
    Ok(())
}
