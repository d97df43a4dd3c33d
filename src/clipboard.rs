//! System clipboard access for the copy-hash commands

use anyhow::{bail, Context, Result};
use arboard::Clipboard;

/// Something text can be copied to
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text)
            .context("Failed to set clipboard contents")
    }
}

/// Copy `text` using `provider`
pub fn copy_with(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    if text.is_empty() {
        bail!("Nothing to copy");
    }
    provider.set_text(text)
}

/// Copy `text` to the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = SystemClipboard::new()?;
    copy_with(text, &mut clipboard)
}
