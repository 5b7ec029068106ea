//! Async clipboard copier and per-control confirmation timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error};

use super::{ClipboardBackend, ClipboardError};

/// How long a copy control stays in its confirmed state.
pub const COPY_CONFIRM_DURATION: Duration = Duration::from_secs(2);

/// Result of a fire-and-forget copy, tagged with the control that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome<K> {
    pub control: K,
    pub result: Result<(), ClipboardError>,
}

/// Writes text to a clipboard backend without blocking the caller.
#[derive(Clone)]
pub struct ClipboardCopier {
    backend: Arc<dyn ClipboardBackend>,
}

impl ClipboardCopier {
    pub fn new(backend: Arc<dyn ClipboardBackend>) -> Self {
        Self { backend }
    }

    /// Copy `text` to the clipboard.
    ///
    /// The write runs on the blocking pool. Failures are logged here and also
    /// returned so the caller can leave its presentation state alone.
    pub async fn copy(&self, text: String) -> Result<(), ClipboardError> {
        let backend = Arc::clone(&self.backend);
        let len = text.len();

        let result = tokio::task::spawn_blocking(move || backend.write_text(&text))
            .await
            .unwrap_or_else(|e| {
                Err(ClipboardError::Unavailable {
                    message: format!("clipboard task failed: {}", e),
                })
            });

        match &result {
            Ok(()) => debug!(bytes = len, "Copied to clipboard"),
            Err(e) => error!(error = %e, "Error copying to clipboard"),
        }

        result
    }

    /// Start a copy and report its outcome on `outcomes` when it resolves.
    pub fn spawn_copy<K>(&self, control: K, text: String, outcomes: mpsc::UnboundedSender<CopyOutcome<K>>)
    where
        K: Send + 'static,
    {
        let copier = self.clone();
        tokio::spawn(async move {
            let result = copier.copy(text).await;
            // Receiver gone means the UI is shutting down
            let _ = outcomes.send(CopyOutcome { control, result });
        });
    }
}

/// Confirmation deadline owned by a single copy control.
///
/// Arming again before expiry replaces the deadline rather than stacking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmTimer {
    deadline: Option<Instant>,
}

impl ConfirmTimer {
    /// Enter the confirmed state at `now` for [`COPY_CONFIRM_DURATION`].
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + COPY_CONFIRM_DURATION);
    }

    pub fn is_confirmed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    /// Drop an elapsed deadline. Returns true if the control just reverted.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
