//! Clipboard output for external screen readers
//!
//! Uses arboard for cross-platform clipboard access

use anyhow::Result;
use arboard::Clipboard;

/// Holds the clipboard open between announcements
pub struct AnnouncementClipboard {
    clipboard: Option<Clipboard>,
    last: Option<String>,
}

impl AnnouncementClipboard {
    /// Clipboard access is attempted lazily on the first copy
    pub fn new() -> Self {
        Self {
            clipboard: None,
            last: None,
        }
    }

    /// Copy `text`, skipping empty text and exact repeats
    pub fn copy(&mut self, text: &str) -> Result<()> {
        if text.is_empty() || self.last.as_deref() == Some(text) {
            return Ok(());
        }

        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new()?);
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return Ok(());
        };
        clipboard.set_text(text.to_string())?;
        self.last = Some(text.to_string());
        tracing::debug!("Copied {} bytes to clipboard", text.len());
        Ok(())
    }
}

impl Default for AnnouncementClipboard {
    fn default() -> Self {
        Self::new()
    }
}
