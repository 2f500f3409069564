use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// What to do about an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// First interrupt: stop sampling and finalize the session
    Finish,
    /// Interrupt while already finishing: give up on finalization
    Abort,
}

/// Exit status for an aborted session (128 + SIGINT)
pub const ABORT_EXIT_CODE: i32 = 130;

/// Cancellation token shared between the sampler and whoever stops it
///
/// Clones observe the same state. Once cancelled it stays cancelled.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request shutdown
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once shutdown has been requested
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Handle an interrupt: cancel the first time, abort after that
    pub fn interrupt(&self) -> InterruptAction {
        if self.tx.send_replace(true) {
            InterruptAction::Abort
        } else {
            InterruptAction::Finish
        }
    }

    /// Cancel on Ctrl-C; a second Ctrl-C exits without finalizing
    pub fn listen_for_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl-C: {}", e);
                    return;
                }

                match signal.interrupt() {
                    InterruptAction::Finish => {
                        info!("Received Ctrl-C, finishing session (press Ctrl-C again to abort)...");
                    }
                    InterruptAction::Abort => {
                        warn!("Received second Ctrl-C, aborting without finalizing");
                        std::process::exit(ABORT_EXIT_CODE);
                    }
                }
            }
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
