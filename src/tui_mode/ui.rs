use super::app::App;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use super::helpers::{highlight_expression, wrap_text};
use crate::calc_engine::{format_value, format_with_spaces, Operator};
use crate::calculator::{is_keypad_key, ERROR_TEXT, KEYPAD};
use crate::config::Screen;
use crate::editor::Editor;
use crate::render_help::render_help;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 16;
const KEYPAD_WIDTH: u16 = 26;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn is_text_input(modifiers: KeyModifiers) -> bool {
    !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        KeyCode::Tab => app.switch_screen(app.screen.next()),
        KeyCode::F(2) => app.switch_screen(Screen::Calculator),
        KeyCode::F(3) => app.switch_screen(Screen::Editor),
        _ => match app.screen {
            Screen::Calculator => handle_calculator_key(app, code, modifiers),
            Screen::Editor => handle_editor_key(app, code, modifiers),
        },
    }
}

fn handle_calculator_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('u') | KeyCode::Char('U') if ctrl => app.calculator.clear(),
        KeyCode::Char('d') | KeyCode::Char('D') if ctrl => app.calculator.toggle_details(),
        KeyCode::Char('l') | KeyCode::Char('L') if ctrl => app.clear_history(),
        KeyCode::Char('=') if is_text_input(modifiers) => app.submit(),
        KeyCode::Char(c) if is_text_input(modifiers) && is_keypad_key(c) => app.calculator.press(c),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.calculator.delete_last(),
        KeyCode::Esc | KeyCode::Delete => app.calculator.clear(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        _ => {}
    }
}

fn handle_editor_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Status messages last until the next key press.
    if let Some(message) = app.editor.take_message() {
        debug!(%message, "dismissed editor message");
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    match code {
        KeyCode::Char('n') | KeyCode::Char('N') if ctrl => app.editor.new_file(),
        KeyCode::Char('s') | KeyCode::Char('S') if ctrl => app.editor.save(),
        KeyCode::Char('x') | KeyCode::Char('X') if ctrl => app.cut(),
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => app.copy(),
        KeyCode::Char('v') | KeyCode::Char('V') if ctrl => app.paste(),
        KeyCode::Char('a') | KeyCode::Char('A') if ctrl => app.editor.select_all(),
        KeyCode::Char(c) if is_text_input(modifiers) => app.editor.insert_char(c),
        KeyCode::Enter => app.editor.newline(),
        KeyCode::Backspace => app.editor.backspace(),
        KeyCode::Delete => app.editor.delete(),
        KeyCode::Left => app.editor.move_left(shift),
        KeyCode::Right => app.editor.move_right(shift),
        KeyCode::Up => app.editor.move_up(shift),
        KeyCode::Down => app.editor.move_down(shift),
        KeyCode::Home => app.editor.move_home(shift),
        KeyCode::End => app.editor.move_end(shift),
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    let delta = match event.kind {
        MouseEventKind::ScrollDown => 3,
        MouseEventKind::ScrollUp => -3,
        _ => return,
    };
    if app.show_help {
        app.help_scroll = app.help_scroll.saturating_add_signed(delta);
        return;
    }
    match app.screen {
        Screen::Calculator => app.history_scroll = app.history_scroll.saturating_add_signed(delta),
        // The editor view follows its cursor, so the wheel moves the cursor.
        Screen::Editor => {
            for _ in 0..delta.unsigned_abs() {
                if delta > 0 {
                    app.editor.move_down(false);
                } else {
                    app.editor.move_up(false);
                }
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small = terminal_size.width < MIN_TERMINAL_WIDTH ||
                             terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        render_resize_message(frame, terminal_size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(terminal_size);

    render_tabs(frame, app, layout[0]);
    match app.screen {
        Screen::Calculator => render_calculator(frame, app, layout[1]),
        Screen::Editor => render_editor(frame, app, layout[1]),
    }
    render_status(frame, app.screen, layout[2]);
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        MIN_TERMINAL_WIDTH,
        MIN_TERMINAL_HEIGHT,
        area.width,
        area.height
    );

    let text = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow)
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let screens = [Screen::Calculator, Screen::Editor];
    let titles: Vec<Line> = screens
        .iter()
        .map(|screen| Line::from(format!(" {} ", screen.title())))
        .collect();
    let selected = screens.iter().position(|&s| s == app.screen).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" SuperCalc: Calculator & Editor ")
                .title_alignment(Alignment::Center),
        )
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_calculator(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(4), Constraint::Min(3)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(KEYPAD_WIDTH), Constraint::Min(10)])
        .split(rows[1]);

    render_display(frame, app, rows[0]);
    render_keypad(frame, app, columns[0]);
    render_history(frame, app, columns[1]);
    app.list_height = columns[1].height as usize;
}

/// The widest suffix of `text` that fits in `width` columns.
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (i, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = i;
    }
    &text[start..]
}

fn render_display(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let width = inner_area.width as usize;
    let result = app.calculator.result.as_deref().unwrap_or("");
    let result_style = if result == ERROR_TEXT {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
    };

    let text = vec![
        Line::from(highlight_expression(
            visible_tail(app.calculator.display_text(), width),
            Style::default(),
        )),
        Line::from(Span::styled(visible_tail(result, width).to_string(), result_style)),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Right), inner_area);
}

fn key_style(key: char) -> Style {
    if key == '=' {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if Operator::from_char(key).is_some() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_keypad(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Keypad ")
        .title_alignment(Alignment::Center);

    let mut lines: Vec<Line> = KEYPAD
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&key| Span::styled(format!(" [{}] ", key), key_style(key)))
                .collect();
            Line::from(spans)
        })
        .collect();

    let command_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    lines.push(Line::from(vec![
        Span::styled(" [C]  ", command_style),
        Span::styled(" [DEL] ", command_style),
    ]));
    lines.push(Line::from(Span::styled(
        format!(" details: {}", if app.calculator.detailed_mode { "on" } else { "off" }),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.calculator.history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Press Enter or = to evaluate.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let mut items = Vec::new();
    app.item_start_indices.clear();

    let wrap_width = inner_area.width.saturating_sub(4) as usize;
    let history = &app.calculator.history;

    for (i, entry) in history.iter().enumerate() {
        app.item_start_indices.push(items.len());

        let is_selected = i == app.cursor_history;
        let base_style = Style::default()
            .fg(if is_selected { Color::Yellow } else { Color::Cyan });

        let input = format_with_spaces(&entry.input);
        let input_lines = wrap_text(&input, wrap_width);

        for (line_idx, line) in input_lines.into_iter().enumerate() {
            let mut result_spans = vec![];

            if line_idx == 0 {
                result_spans.push(Span::styled("> ", Style::default().fg(Color::Green)));
            } else {
                result_spans.push(Span::styled("  ", Style::default()));
            }

            result_spans.extend(highlight_expression(&line, base_style));

            if line_idx == 0 {
                result_spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                match &entry.result {
                    Ok(val) => {
                        result_spans.push(Span::styled(
                            val.clone(),
                            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
                        ));
                    }
                    Err(e) => {
                        result_spans.push(Span::styled(
                            format!("Error: {}", e),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                        ));
                    }
                }
            }

            items.push(ListItem::new(Line::from(result_spans)));
        }

        if entry.detailed_mode {
            for (j, step) in entry.detailed_steps.iter().enumerate() {
                let step_text = format!("Step {}: {} = {}", j + 1, step.operation, format_value(step.result));
                for (step_idx, line) in wrap_text(&step_text, wrap_width).into_iter().enumerate() {
                    let prefix = if step_idx == 0 { "    - " } else { "      " };
                    let span = Span::styled(
                        format!("{}{}", prefix, line),
                        Style::default().fg(Color::DarkGray)
                    );
                    items.push(ListItem::new(Line::from(span)));
                }
            }

            let time_str = format!(
                "Time: {:.6} ms",
                entry.duration.as_secs_f64() * 1000.0
            );
            for (time_idx, line) in wrap_text(&time_str, wrap_width).into_iter().enumerate() {
                let prefix = if time_idx == 0 { "    - " } else { "      " };
                let span = Span::styled(
                    format!("{}{}", prefix, line),
                    Style::default().fg(Color::Magenta)
                );
                items.push(ListItem::new(Line::from(span)));
            }
        }

        if i < history.len() - 1 {
            let separator = Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray)
            );
            items.push(ListItem::new(Line::from(separator)));
        }
    }

    let visible = inner_area.height as usize;
    if app.scroll_to_bottom {
        app.history_scroll = last_page_offset(items.len(), visible);
        app.scroll_to_bottom = false;
    }
    app.history_scroll = app.history_scroll.min(last_page_offset(items.len(), visible));

    let selected_index = app.item_start_indices.get(app.cursor_history).copied();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
    // The list may move the offset to keep the selection visible.
    app.history_scroll = state.offset();
}

/// Offset that shows the last `visible` of `total` rows.
fn last_page_offset(total: usize, visible: usize) -> usize {
    total.saturating_sub(visible)
}

fn render_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(editor_hint(&app.editor)), rows[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Notepad ")
        .title_alignment(Alignment::Center);
    let inner_area = block.inner(rows[1]);

    let selection = app.editor.selection();
    let selected_style = Style::default().bg(Color::Blue).fg(Color::White);
    let mut lines: Vec<Line> = Vec::new();
    let mut plain_lines: Vec<String> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    let mut plain = String::new();

    for (i, grapheme) in app.editor.text().graphemes(true).enumerate() {
        if grapheme == "\n" || grapheme == "\r\n" {
            lines.push(Line::from(std::mem::take(&mut spans)));
            plain_lines.push(std::mem::take(&mut plain));
            continue;
        }
        let style = match &selection {
            Some(range) if range.contains(&i) => selected_style,
            _ => Style::default(),
        };
        spans.push(Span::styled(grapheme.to_string(), style));
        plain.push_str(grapheme);
    }
    lines.push(Line::from(spans));
    plain_lines.push(plain);

    let height = inner_area.height as usize;
    app.adjust_editor_scroll(height);
    app.editor_scroll = app.editor_scroll.min(plain_lines.len().saturating_sub(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.editor_scroll as u16, 0));
    frame.render_widget(paragraph, rows[1]);

    let (line, column) = app.editor.cursor_line_col();
    if line >= app.editor_scroll && line < app.editor_scroll + height {
        let prefix: String = plain_lines
            .get(line)
            .map(|text| text.graphemes(true).take(column).collect())
            .unwrap_or_default();
        let cursor_x = inner_area.x + (prefix.width() as u16).min(inner_area.width.saturating_sub(1));
        let cursor_y = inner_area.y + (line - app.editor_scroll) as u16;
        frame.set_cursor(cursor_x, cursor_y);
    }

    if let Some(message) = app.editor.message() {
        let snackbar = Paragraph::new(format!(" {} ", message))
            .style(Style::default().fg(Color::Black).bg(Color::Yellow));
        frame.render_widget(snackbar, rows[2]);
    }
}

/// Top line of the editor. While text is selected it becomes a
/// Cut/Copy/Paste menu.
fn editor_hint(editor: &Editor) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let Some(range) = editor.selection() else {
        let text = if editor.is_empty() {
            "Empty file. Type to start, ^V to paste. Shift+arrows select."
        } else {
            "Editor (one file). New, Save (simulated), Cut/Copy/Paste. Shift+arrows select."
        };
        return Line::from(Span::styled(text, dim));
    };

    let key_style = Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(format!("{} selected: ", range.len()), dim)];
    for (label, key) in [("Cut", "^X"), ("Copy", "^C"), ("Paste", "^V")] {
        spans.push(Span::styled(format!(" {} {} ", label, key), key_style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_status(frame: &mut Frame, screen: Screen, area: Rect) {
    let keys: &[(&str, &str)] = match screen {
        Screen::Calculator => &[
            ("Enter/=", "Calculate"),
            ("Bksp", "DEL"),
            ("Esc", "C"),
            ("Up/Down", "History"),
            ("Ctrl+D", "Details"),
            ("Tab", "Editor"),
            ("F1", "Help"),
        ],
        Screen::Editor => &[
            ("^N", "New"),
            ("^S", "Save"),
            ("^X", "Cut"),
            ("^C", "Copy"),
            ("^V", "Paste"),
            ("Tab", "Calculator"),
            ("F1", "Help"),
        ],
    };

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    *key,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {} ", desc),
                    Style::default().fg(Color::DarkGray),
                ),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn app() -> App {
        App::new(Screen::Calculator, Box::new(MemoryClipboard::default()))
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            handle_key_event(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn shifted_operators_reach_the_calculator() {
        let mut app = app();
        type_keys(&mut app, "2");
        handle_key_event(&mut app, KeyCode::Char('+'), KeyModifiers::SHIFT);
        type_keys(&mut app, "3=");
        assert_eq!(app.calculator.result.as_deref(), Some("5"));
    }

    #[test]
    fn calculator_keys() {
        let mut app = app();
        type_keys(&mut app, "9/4");
        handle_key_event(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.calculator.result.as_deref(), Some("2.25"));

        handle_key_event(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.calculator.display, "9/");
        handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.calculator.display_text(), "0");
    }

    #[test]
    fn calculator_ignores_keys_off_the_keypad() {
        let mut app = app();
        type_keys(&mut app, "1q x");
        assert_eq!(app.calculator.display, "1");
        type_keys(&mut app, "+1=");
        assert_eq!(app.calculator.result.as_deref(), Some("2"));
    }

    fn wheel(kind: MouseEventKind) -> crossterm::event::MouseEvent {
        crossterm::event::MouseEvent { kind, column: 0, row: 0, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn history_scroll_is_clamped_to_the_last_page() {
        assert_eq!(last_page_offset(10, 4), 6);
        assert_eq!(last_page_offset(3, 4), 0);

        let mut app = app();
        type_keys(&mut app, "1+1=2*2=");
        for _ in 0..20 {
            handle_mouse_event(&mut app, wheel(MouseEventKind::ScrollDown));
        }
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        let scrolled = app.history_scroll;
        assert!(scrolled < 60, "offset {} was not written back", scrolled);

        handle_mouse_event(&mut app, wheel(MouseEventKind::ScrollUp));
        assert_eq!(app.history_scroll, scrolled.saturating_sub(3));
    }

    fn hint_text(editor: &Editor) -> String {
        editor_hint(editor).spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn selection_shows_the_clipboard_menu() {
        let mut editor = Editor::new();
        assert!(hint_text(&editor).starts_with("Empty file"));

        editor.insert_str("hello");
        let plain = hint_text(&editor);
        assert!(!plain.contains("selected"));

        editor.select(1..4);
        let menu = hint_text(&editor);
        assert!(menu.starts_with("3 selected"));
        for entry in ["Cut ^X", "Copy ^C", "Paste ^V"] {
            assert!(menu.contains(entry), "{}", menu);
        }
    }

    #[test]
    fn tab_switches_screens_and_routes_typing() {
        let mut app = app();
        handle_key_event(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Editor);
        type_keys(&mut app, "hi");
        handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.editor.text(), "hi");
        assert!(app.editor.message().is_some());

        handle_key_event(&mut app, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(app.editor.message(), None);
        assert!(app.calculator.display.is_empty());
    }

    #[test]
    fn editor_shortcuts_use_the_app_clipboard() {
        let mut app = app();
        app.switch_screen(Screen::Editor);
        type_keys(&mut app, "abc");
        handle_key_event(&mut app, KeyCode::Left, KeyModifiers::SHIFT);
        handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(app.editor.text(), "ab");
        handle_key_event(&mut app, KeyCode::Home, KeyModifiers::NONE);
        handle_key_event(&mut app, KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(app.editor.text(), "cab");
    }

    #[test]
    fn help_and_quit() {
        let mut app = app();
        handle_key_event(&mut app, KeyCode::F(1), KeyModifiers::NONE);
        assert!(app.show_help);
        type_keys(&mut app, "12");
        assert!(app.calculator.display.is_empty());
        handle_key_event(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.show_help);
        handle_key_event(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn visible_tail_keeps_the_end() {
        assert_eq!(visible_tail("123456", 3), "456");
        assert_eq!(visible_tail("12", 3), "12");
        assert_eq!(visible_tail("", 3), "");
    }
}
