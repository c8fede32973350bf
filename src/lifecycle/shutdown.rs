//! Signal handling for graceful shutdown

use tracing::debug;

/// Which signal asked the daemon to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGTERM
    Terminate,
    /// SIGINT / Ctrl-C
    Interrupt,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::Terminate => write!(f, "SIGTERM"),
            ShutdownReason::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Handles shutdown signals (SIGTERM, SIGINT)
#[derive(Debug, Default)]
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal
    #[cfg(unix)]
    pub async fn wait(&self) -> std::io::Result<ShutdownReason> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        let reason = tokio::select! {
            _ = sigterm.recv() => ShutdownReason::Terminate,
            _ = sigint.recv() => ShutdownReason::Interrupt,
        };
        debug!(%reason, "received shutdown signal");
        Ok(reason)
    }

    /// Wait for a shutdown signal
    #[cfg(not(unix))]
    pub async fn wait(&self) -> std::io::Result<ShutdownReason> {
        tokio::signal::ctrl_c().await?;
        debug!("received Ctrl-C");
        Ok(ShutdownReason::Interrupt)
    }
}
