//! Ctrl-C handling.

use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SHUTDOWN;

/// Spawns a task that cancels `token` on the first Ctrl-C.
///
/// The task ends on its own once the token is cancelled from elsewhere.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {}
            result = ctrl_c() => match result {
                Ok(()) => {
                    tracing::info!(
                        target: TRACING_TARGET_SHUTDOWN,
                        "Received Ctrl+C signal, cancelling request"
                    );
                    token.cancel();
                }
                Err(e) => {
                    tracing::error!(
                        target: TRACING_TARGET_SHUTDOWN,
                        error = %e,
                        "Failed to install Ctrl+C handler"
                    );
                }
            },
        }
    });
}
