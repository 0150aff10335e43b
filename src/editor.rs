use std::ops::Range;

use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::clipboard::Clipboard;

pub const NEW_FILE_MESSAGE: &str = "New file created";
pub const SAVE_MESSAGE: &str = "Save simulated (persistence not implemented)";
pub const COPIED_MESSAGE: &str = "Copied";
pub const NOTHING_TO_CUT_MESSAGE: &str = "No selection to cut";
pub const NOTHING_TO_COPY_MESSAGE: &str = "No selection to copy";
pub const CLIPBOARD_EMPTY_MESSAGE: &str = "Clipboard empty";

/// A single text buffer. The cursor and the selection anchor count
/// grapheme clusters, not bytes.
#[derive(Debug, Default)]
pub struct Editor {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
    message: Option<String>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.insert_str(text);
        editor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_index(&self, index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// The selected grapheme range, if it is non-empty.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            None
        } else {
            Some(anchor.min(self.cursor)..anchor.max(self.cursor))
        }
    }

    pub fn selected_text(&self) -> Option<&str> {
        let range = self.selection()?;
        Some(&self.text[self.byte_index(range.start)..self.byte_index(range.end)])
    }

    /// Selects `range`, leaving the cursor at its end.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.len();
        self.anchor = Some(range.start.min(len));
        self.cursor = range.end.min(len);
    }

    pub fn select_all(&mut self) {
        self.select(0..self.len());
    }

    fn delete_selection(&mut self) -> bool {
        let selection = self.selection();
        self.anchor = None;
        match selection {
            Some(range) => {
                let (start, end) = (self.byte_index(range.start), self.byte_index(range.end));
                self.text.replace_range(start..end, "");
                self.cursor = range.start;
                true
            }
            None => false,
        }
    }

    fn remove_grapheme(&mut self, index: usize) {
        let (start, end) = (self.byte_index(index), self.byte_index(index + 1));
        self.text.replace_range(start..end, "");
    }

    /// Inserts at the cursor, replacing the selection if there is one.
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, s);
        // Combining marks can merge with their neighbour, so recount.
        self.cursor = self.text[..at + s.len()].graphemes(true).count();
    }

    pub fn insert_char(&mut self, c: char) {
        self.insert_str(c.encode_utf8(&mut [0; 4]));
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if !self.delete_selection() && self.cursor > 0 {
            self.cursor -= 1;
            self.remove_grapheme(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if !self.delete_selection() && self.cursor < self.len() {
            self.remove_grapheme(self.cursor);
        }
    }

    fn move_to(&mut self, index: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = index.min(self.len());
    }

    /// Grapheme index at which each line starts.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        starts.extend(
            self.text
                .graphemes(true)
                .enumerate()
                .filter(|(_, g)| *g == "\n" || *g == "\r\n")
                .map(|(i, _)| i + 1),
        );
        starts
    }

    fn line_end(&self, starts: &[usize], line: usize) -> usize {
        match starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.len(),
        }
    }

    /// Zero-based line and column (in graphemes) of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let line = starts.partition_point(|&start| start <= self.cursor) - 1;
        (line, self.cursor - starts[line])
    }

    pub fn move_left(&mut self, extend: bool) {
        self.move_to(self.cursor.saturating_sub(1), extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        self.move_to(self.cursor + 1, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        let starts = self.line_starts();
        let (line, _) = self.cursor_line_col();
        self.move_to(starts[line], extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        let starts = self.line_starts();
        let (line, _) = self.cursor_line_col();
        self.move_to(self.line_end(&starts, line), extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let starts = self.line_starts();
        let (line, column) = self.cursor_line_col();
        let target = match line.checked_sub(1) {
            Some(above) => (starts[above] + column).min(self.line_end(&starts, above)),
            None => 0,
        };
        self.move_to(target, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let starts = self.line_starts();
        let (line, column) = self.cursor_line_col();
        let target = if line + 1 < starts.len() {
            (starts[line + 1] + column).min(self.line_end(&starts, line + 1))
        } else {
            self.len()
        };
        self.move_to(target, extend);
    }

    pub fn new_file(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.anchor = None;
        self.set_message(NEW_FILE_MESSAGE);
    }

    pub fn save(&mut self) {
        debug!(bytes = self.text.len(), "save requested");
        self.set_message(SAVE_MESSAGE);
    }

    fn write_clipboard(&mut self, clipboard: &mut dyn Clipboard, text: &str) -> bool {
        match clipboard.set_text(text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.set_message(format!("Clipboard unavailable: {}", e));
                false
            }
        }
    }

    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(text) = self.selected_text().map(str::to_string) else {
            self.set_message(NOTHING_TO_CUT_MESSAGE);
            return;
        };
        if self.write_clipboard(clipboard, &text) {
            self.delete_selection();
        }
    }

    pub fn copy(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(text) = self.selected_text().map(str::to_string) else {
            self.set_message(NOTHING_TO_COPY_MESSAGE);
            return;
        };
        if self.write_clipboard(clipboard, &text) {
            self.set_message(COPIED_MESSAGE);
        }
    }

    pub fn paste(&mut self, clipboard: &mut dyn Clipboard) {
        match clipboard.get_text() {
            Some(text) => self.insert_str(&text),
            None => self.set_message(CLIPBOARD_EMPTY_MESSAGE),
        }
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    #[test]
    fn typing_and_backspace() {
        let mut editor = Editor::new();
        for c in "hello".chars() {
            editor.insert_char(c);
        }
        editor.backspace();
        assert_eq!(editor.text(), "hell");
        assert_eq!(editor.cursor(), 4);

        editor.move_home(false);
        editor.delete();
        assert_eq!(editor.text(), "ell");
        assert_eq!(editor.cursor(), 0);
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn get_text(&mut self) -> Option<String> {
            None
        }

        fn set_text(&mut self, _text: &str) -> anyhow::Result<()> {
            anyhow::bail!("no display server")
        }
    }

    #[test]
    fn failed_clipboard_write_keeps_text_and_reports() {
        let mut clipboard = BrokenClipboard;
        let mut editor = Editor::with_text("abc");
        editor.select(0..2);
        editor.cut(&mut clipboard);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.selected_text(), Some("ab"));
        assert_eq!(editor.message(), Some("Clipboard unavailable: no display server"));

        editor.take_message();
        editor.copy(&mut clipboard);
        assert_ne!(editor.message(), Some(COPIED_MESSAGE));
        assert!(editor.message().is_some_and(|m| m.starts_with("Clipboard unavailable")));
    }

    #[test]
    fn cut_moves_selection_to_clipboard() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = Editor::with_text("hello world");
        editor.select(5..11);
        editor.cut(&mut clipboard);

        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.cursor(), 5);
        assert_eq!(editor.selection(), None);
        assert_eq!(clipboard.get_text().as_deref(), Some(" world"));
        assert_eq!(editor.message(), None);
    }

    #[test]
    fn cut_and_copy_without_selection_report_it() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = Editor::with_text("abc");

        editor.cut(&mut clipboard);
        assert_eq!(editor.take_message().as_deref(), Some(NOTHING_TO_CUT_MESSAGE));
        editor.copy(&mut clipboard);
        assert_eq!(editor.take_message().as_deref(), Some(NOTHING_TO_COPY_MESSAGE));
        assert_eq!(editor.take_message(), None);
        assert_eq!(editor.text(), "abc");
    }

    #[test]
    fn copy_keeps_text() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = Editor::with_text("abc");
        editor.select(0..2);
        editor.copy(&mut clipboard);

        assert_eq!(editor.text(), "abc");
        assert_eq!(clipboard.get_text().as_deref(), Some("ab"));
        assert_eq!(editor.message(), Some(COPIED_MESSAGE));
    }

    #[test]
    fn paste_replaces_selection_and_moves_cursor_after_it() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.set_text("XYZ").unwrap();
        let mut editor = Editor::with_text("abcdef");
        editor.select(1..3);
        editor.paste(&mut clipboard);

        assert_eq!(editor.text(), "aXYZdef");
        assert_eq!(editor.cursor(), 4);
    }

    #[test]
    fn paste_from_empty_clipboard() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = Editor::with_text("abc");
        editor.paste(&mut clipboard);

        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.message(), Some(CLIPBOARD_EMPTY_MESSAGE));
    }

    #[test]
    fn new_file_and_save() {
        let mut editor = Editor::with_text("draft");
        editor.save();
        assert_eq!(editor.take_message().as_deref(), Some(SAVE_MESSAGE));
        assert_eq!(editor.text(), "draft");

        editor.new_file();
        assert!(editor.is_empty());
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.message(), Some(NEW_FILE_MESSAGE));
    }

    #[test]
    fn shift_selection_and_typing_over_it() {
        let mut editor = Editor::with_text("abcd");
        editor.move_left(true);
        editor.move_left(true);
        assert_eq!(editor.selected_text(), Some("cd"));

        editor.insert_char('!');
        assert_eq!(editor.text(), "ab!");
        assert_eq!(editor.selection(), None);

        editor.select_all();
        editor.backspace();
        assert!(editor.is_empty());
    }

    #[test]
    fn cursor_counts_graphemes() {
        let mut editor = Editor::with_text("e\u{301}a");
        assert_eq!(editor.len(), 2);
        editor.move_left(false);
        editor.backspace();
        assert_eq!(editor.text(), "a");

        let mut editor = Editor::with_text("e");
        editor.insert_char('\u{301}');
        assert_eq!(editor.cursor(), 1);
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut editor = Editor::with_text("long line\nab\nlonger line");
        assert_eq!(editor.cursor_line_col(), (2, 11));

        editor.move_up(false);
        assert_eq!(editor.cursor_line_col(), (1, 2));
        editor.move_up(false);
        assert_eq!(editor.cursor_line_col(), (0, 2));
        editor.move_up(false);
        assert_eq!(editor.cursor(), 0);

        editor.move_end(false);
        assert_eq!(editor.cursor_line_col(), (0, 9));
        editor.move_down(false);
        assert_eq!(editor.cursor_line_col(), (1, 2));
        editor.move_down(false);
        editor.move_down(false);
        assert_eq!(editor.cursor(), editor.len());
    }
}
