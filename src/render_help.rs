use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui_mode::app::App;

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" SuperCalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled("SuperCalc - Calculator & Editor", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))),
        Line::from(""),
        heading("Operations:"),
        Line::from("  + : Addition        (e.g., 5 + 3 = 8)"),
        Line::from("  - : Subtraction     (e.g., 10 - 4 - 1 = 5)"),
        Line::from("  * : Multiplication  (e.g., 2 + 3 * 4 = 14)"),
        Line::from("  / : Division        (e.g., 7 / 2 = 3.5, 1 / 0 = Infinity)"),
        Line::from("  * and / bind tighter than + and -; equal operators go left to right."),
        Line::from("  No parentheses, no unary minus."),
        Line::from(""),
        heading("Calculator:"),
        Line::from("  0-9 . + - * / : Append to the display (other keys are ignored)"),
        Line::from("  Enter or =    : Calculate"),
        Line::from("  Backspace     : DEL (remove last character)"),
        Line::from("  Esc / Ctrl+U  : C (clear display and result)"),
        Line::from("  Ctrl+D        : Toggle step-by-step details"),
        Line::from("  Ctrl+L        : Clear history"),
        Line::from("  ↑ ↓           : Recall previous calculations"),
        Line::from("  PgUp/PgDn     : Page through history"),
        Line::from(""),
        heading("Editor:"),
        Line::from("  Ctrl+N : New file"),
        Line::from("  Ctrl+S : Save (simulated, nothing is written)"),
        Line::from("  Ctrl+X : Cut selection"),
        Line::from("  Ctrl+C : Copy selection"),
        Line::from("  Ctrl+V : Paste"),
        Line::from("  Ctrl+A : Select all"),
        Line::from("  Shift + arrows/Home/End : Extend selection"),
        Line::from(""),
        heading("General:"),
        Line::from("  Tab     : Switch between Calculator and Editor"),
        Line::from("  F2 / F3 : Calculator / Editor"),
        Line::from("  F1      : Show this help, Esc to close"),
        Line::from("  Ctrl+Q  : Quit"),
        Line::from("  Mouse wheel : Scroll"),
    ];

    app.help_scroll = app.help_scroll.min(help_text.len().saturating_sub(1));
    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
