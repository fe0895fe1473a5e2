//! Clipboard access for the copy action
//!
//! Uses the `arboard` crate for cross-platform clipboard access. On X11 and
//! Wayland the copied text stays available only while the handle lives, so
//! short-lived processes ask the handle to hold the selection until another
//! application replaces it.

use arboard::Clipboard;

use super::InteractionError;

/// Destination for copied query text
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), InteractionError>;
}

/// Handler for the system clipboard
pub struct SystemClipboard {
    clipboard: Clipboard,
    hold: bool,
}

impl SystemClipboard {
    /// Create a new clipboard handler
    ///
    /// Returns an error if clipboard access is not available (headless
    /// sessions, missing display server).
    pub fn new() -> Result<Self, InteractionError> {
        let clipboard =
            Clipboard::new().map_err(|e| InteractionError::Clipboard(e.to_string()))?;
        Ok(Self {
            clipboard,
            hold: false,
        })
    }

    /// Make `set_text` block until the copied text is replaced
    ///
    /// Only has an effect on X11 and Wayland; elsewhere the system clipboard
    /// keeps the text after the process exits.
    pub fn hold_until_replaced(mut self) -> Self {
        self.hold = true;
        self
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), InteractionError> {
        #[cfg(all(
            unix,
            not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
        ))]
        if self.hold {
            use arboard::SetExtLinux;
            return self
                .clipboard
                .set()
                .wait()
                .text(text.to_string())
                .map_err(|e| InteractionError::Clipboard(e.to_string()));
        }

        self.clipboard
            .set_text(text.to_string())
            .map_err(|e| InteractionError::Clipboard(e.to_string()))
    }
}

/// In-memory clipboard, used when no system clipboard is reachable and in tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub writes: usize,
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), InteractionError> {
        self.contents = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records_writes() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.set_text("first").unwrap();
        clipboard.set_text("second").unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("second"));
        assert_eq!(clipboard.writes, 2);
    }

    // Requires a display server and clipboard access
    #[test]
    #[ignore]
    fn test_system_clipboard_set_text() {
        let mut clipboard = SystemClipboard::new().unwrap();
        assert!(clipboard.set_text("stockq").is_ok());
    }

    // Requires a display server and clipboard access
    #[test]
    #[ignore]
    fn test_held_text_is_served_until_replaced() {
        let holder = std::thread::spawn(|| {
            let mut clipboard = SystemClipboard::new().unwrap().hold_until_replaced();
            clipboard.set_text("held query")
        });
        std::thread::sleep(std::time::Duration::from_millis(200));

        let mut reader = Clipboard::new().unwrap();
        assert_eq!(reader.get_text().unwrap(), "held query");

        reader.set_text("something else").unwrap();
        assert!(holder.join().unwrap().is_ok());
    }
}
