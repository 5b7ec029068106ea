//! System clipboard backed by `arboard`.

use std::sync::Mutex;

use tracing::debug;

use super::{ClipboardBackend, ClipboardError};

/// Handle to the OS clipboard.
///
/// The platform handle is opened on first write and kept for the life of the
/// value; on X11 and Wayland the copied text only survives while its owner is
/// alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
    hold_until_replaced: bool,
}

impl SystemClipboard {
    /// Clipboard for a long-running process that keeps ownership while it runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard for a process that exits right after copying.
    ///
    /// On Linux each write blocks until another application takes over the
    /// clipboard, so the text stays pasteable after the copy returns.
    pub fn one_shot() -> Self {
        Self {
            hold_until_replaced: true,
            ..Self::default()
        }
    }

    pub fn holds_until_replaced(&self) -> bool {
        self.hold_until_replaced
    }
}

impl ClipboardBackend for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self.handle.lock().map_err(|_| ClipboardError::Unavailable {
            message: "clipboard handle poisoned".to_string(),
        })?;

        if guard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(unavailable)?;
            debug!("Opened system clipboard");
            *guard = Some(clipboard);
        }

        match guard.as_mut() {
            Some(clipboard) => set_text(clipboard, text, self.hold_until_replaced).map_err(unavailable),
            None => Err(ClipboardError::Unavailable {
                message: "clipboard not initialized".to_string(),
            }),
        }
    }
}

#[cfg(target_os = "linux")]
fn set_text(clipboard: &mut arboard::Clipboard, text: &str, hold: bool) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    if hold {
        debug!("Serving clipboard until another owner takes it");
        clipboard.set().wait().text(text.to_owned())
    } else {
        clipboard.set_text(text.to_owned())
    }
}

#[cfg(not(target_os = "linux"))]
fn set_text(clipboard: &mut arboard::Clipboard, text: &str, _hold: bool) -> Result<(), arboard::Error> {
    clipboard.set_text(text.to_owned())
}

fn unavailable(err: arboard::Error) -> ClipboardError {
    ClipboardError::Unavailable {
        message: err.to_string(),
    }
}
