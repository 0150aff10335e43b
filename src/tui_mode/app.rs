use crate::calculator::Calculator;
use crate::clipboard::Clipboard;
use crate::config::Screen;
use crate::editor::Editor;

pub struct App {
    pub screen: Screen,
    pub calculator: Calculator,
    pub editor: Editor,
    pub clipboard: Box<dyn Clipboard>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub editor_scroll: usize,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(screen: Screen, clipboard: Box<dyn Clipboard>) -> Self {
        App {
            screen,
            calculator: Calculator::new(),
            editor: Editor::new(),
            clipboard,
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            editor_scroll: 0,
            terminal_too_small: false,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn submit(&mut self) {
        self.calculator.evaluate();
        self.cursor_history = self.calculator.history.len().saturating_sub(1);
        self.scroll_to_bottom = true;
    }

    pub fn navigate_history(&mut self, direction: i32) {
        let history_len = self.calculator.history.len();
        if history_len == 0 {
            return;
        }
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < history_len - 1 {
            self.cursor_history += 1;
        }

        self.calculator.recall(self.cursor_history);
        self.scroll_to_bottom = false;
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self.cursor_history.saturating_add(step)
                .min(self.calculator.history.len().saturating_sub(1));
        }

        self.calculator.recall(self.cursor_history);
        self.scroll_to_bottom = false;
    }

    pub fn clear_history(&mut self) {
        self.calculator.clear_history();
        self.cursor_history = 0;
        self.history_scroll = 0;
    }

    pub fn cut(&mut self) {
        self.editor.cut(self.clipboard.as_mut());
    }

    pub fn copy(&mut self) {
        self.editor.copy(self.clipboard.as_mut());
    }

    pub fn paste(&mut self) {
        self.editor.paste(self.clipboard.as_mut());
    }

    /// Keeps the editor cursor row inside a viewport of `height` rows.
    pub fn adjust_editor_scroll(&mut self, height: usize) {
        let (line, _) = self.editor.cursor_line_col();
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if height > 0 && line >= self.editor_scroll + height {
            self.editor_scroll = line + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn app() -> App {
        App::new(Screen::Calculator, Box::new(MemoryClipboard::default()))
    }

    #[test]
    fn submit_selects_newest_entry() {
        let mut app = app();
        for expression in ["1+1", "2*3", "9-4"] {
            app.calculator.display = expression.to_string();
            app.submit();
        }
        assert_eq!(app.cursor_history, 2);
        assert!(app.scroll_to_bottom);

        app.navigate_history(-1);
        assert_eq!(app.calculator.display, "2*3");
        app.navigate_history(-1);
        app.navigate_history(-1);
        assert_eq!(app.calculator.display, "1+1");
        app.navigate_history(1);
        assert_eq!(app.calculator.display, "2*3");
    }

    #[test]
    fn navigating_empty_history_keeps_display() {
        let mut app = app();
        app.calculator.display = "5".to_string();
        app.navigate_history(-1);
        app.scroll_history(1);
        assert_eq!(app.calculator.display, "5");
    }

    #[test]
    fn clipboard_round_trip_through_app() {
        let mut app = app();
        app.switch_screen(Screen::Editor);
        app.editor.insert_str("abc");
        app.editor.select_all();
        app.copy();
        app.editor.move_end(false);
        app.paste();
        assert_eq!(app.editor.text(), "abcabc");
        app.editor.select_all();
        app.cut();
        assert!(app.editor.is_empty());
    }

    #[test]
    fn editor_scroll_follows_cursor() {
        let mut app = app();
        app.editor.insert_str("1\n2\n3\n4\n5");
        app.adjust_editor_scroll(2);
        assert_eq!(app.editor_scroll, 3);
        app.editor.select(0..0);
        app.adjust_editor_scroll(2);
        assert_eq!(app.editor_scroll, 0);
    }
}
