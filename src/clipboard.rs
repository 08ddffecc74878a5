use anyhow::Context;
use arboard::Clipboard;

/// Text clipboard used by the copy, cut and paste commands.
pub trait ClipboardProvider {
    fn read_text(&mut self) -> anyhow::Result<String>;
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// The operating system clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn read_text(&mut self) -> anyhow::Result<String> {
        let mut cb = Clipboard::new().context("open clipboard")?;
        Ok(cb.get_text().context("read clipboard text")?)
    }

    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        let mut cb = Clipboard::new().context("open clipboard")?;
        cb.set_text(text.to_string())
            .context("write clipboard text")?;
        Ok(())
    }
}

/// In-process clipboard, used when no system clipboard is reachable.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl ClipboardProvider for MemoryClipboard {
    fn read_text(&mut self) -> anyhow::Result<String> {
        self.text
            .clone()
            .ok_or_else(|| anyhow::anyhow!("clipboard is empty"))
    }

    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// Read the clipboard, treating any failure as "nothing to paste".
pub fn read_or_none(clipboard: &mut dyn ClipboardProvider) -> Option<String> {
    match clipboard.read_text() {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "clipboard read failed");
            None
        }
    }
}

/// Write to the clipboard, returning whether it succeeded.
pub fn write_or_log(clipboard: &mut dyn ClipboardProvider, text: &str) -> bool {
    match clipboard.write_text(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "clipboard write failed");
            false
        }
    }
}
