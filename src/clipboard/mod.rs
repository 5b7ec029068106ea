//! Clipboard access: backend abstraction, system backend, async copier.

mod copier;
mod system;

pub use copier::{ClipboardCopier, ConfirmTimer, CopyOutcome};
#[cfg(test)]
pub use copier::COPY_CONFIRM_DURATION;
pub use system::SystemClipboard;

use thiserror::Error;

/// Clipboard write failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Clipboard missing, access denied, or write rejected.
    #[error("Clipboard unavailable: {message}")]
    Unavailable {
        /// Platform error message.
        message: String,
    },
}

/// Something text can be written to.
///
/// Writes are blocking; [`ClipboardCopier`] moves them off the event loop.
pub trait ClipboardBackend: Send + Sync + 'static {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::{ClipboardBackend, ClipboardError};

    /// In-memory clipboard that records writes, or rejects them all.
    #[derive(Default)]
    pub struct FakeClipboard {
        pub writes: Mutex<Vec<String>>,
        pub fail: bool,
    }

    impl FakeClipboard {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn contents(&self) -> Option<String> {
            self.writes.lock().unwrap().last().cloned()
        }
    }

    impl ClipboardBackend for FakeClipboard {
        fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable {
                    message: "permission denied".to_string(),
                });
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }
}
