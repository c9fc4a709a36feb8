// OS shutdown signals
// Decision: Handlers are installed before connecting, so a failure surfaces at startup
// Decision: SIGINT (Ctrl+C) and SIGTERM both trigger the same graceful shutdown

use std::fmt;

use tokio::signal;
use tracing::info;

/// Which signal ended the serve phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => write!(f, "SIGINT"),
            ShutdownReason::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: signal::unix::Signal,
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl ShutdownSignal {
    /// Install the signal handlers.
    ///
    /// Both handlers are registered here, so a signal that arrives while the
    /// worker is still connecting is buffered instead of killing the process.
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            interrupt: signal::unix::signal(signal::unix::SignalKind::interrupt())?,
            #[cfg(unix)]
            terminate: signal::unix::signal(signal::unix::SignalKind::terminate())?,
        })
    }

    /// Wait for either:
    /// * SIGINT (Ctrl+C)
    /// * SIGTERM (sent by process managers like systemd or the kubelet)
    #[cfg(unix)]
    pub async fn recv(mut self) -> ShutdownReason {
        let reason = tokio::select! {
            _ = self.interrupt.recv() => ShutdownReason::Interrupt,
            _ = self.terminate.recv() => ShutdownReason::Terminate,
        };

        info!(signal = %reason, "Received shutdown signal");
        reason
    }

    /// Wait for Ctrl+C
    #[cfg(not(unix))]
    pub async fn recv(self) -> ShutdownReason {
        // Only a delivered Ctrl+C ends the serve phase.
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }

        let reason = ShutdownReason::Interrupt;
        info!(signal = %reason, "Received shutdown signal");
        reason
    }
}
