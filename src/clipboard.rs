use anyhow::Result;

/// Text clipboard used by the editor screen.
pub trait Clipboard {
    /// Returns `None` when the clipboard holds no text.
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents.clone().filter(|text| !text.is_empty())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The desktop clipboard, or a process-local one when no display server is
/// reachable.
#[cfg(feature = "tui")]
pub struct SystemClipboard {
    system: Option<arboard::Clipboard>,
    fallback: MemoryClipboard,
}

#[cfg(feature = "tui")]
impl SystemClipboard {
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::warn!(error = %e, "system clipboard unavailable, using in-memory clipboard");
                None
            }
        };
        SystemClipboard {
            system,
            fallback: MemoryClipboard::default(),
        }
    }
}

#[cfg(feature = "tui")]
impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match self.system.as_mut() {
            Some(clipboard) => clipboard.get_text().ok().filter(|text| !text.is_empty()),
            None => self.fallback.get_text(),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        use anyhow::Context;

        match self.system.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .context("Failed to copy to clipboard"),
            None => self.fallback.set_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips_text() {
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.get_text(), None);
        clipboard.set_text("hello").unwrap();
        assert_eq!(clipboard.get_text().as_deref(), Some("hello"));
    }

    #[test]
    fn empty_text_reads_as_empty_clipboard() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.set_text("").unwrap();
        assert_eq!(clipboard.get_text(), None);
    }
}
