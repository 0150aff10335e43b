use crate::calc_engine::{evaluate_traced, format_value, format_with_spaces, EvaluationTrace};
use anyhow::{Context, Result};
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use tracing::info;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Expression: ";

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

/// Splits a `details` prefix or suffix off the input.
fn parse_details(input: &str) -> (bool, &str) {
    if input.eq_ignore_ascii_case("details") {
        return (true, "");
    }
    let prefixed = input
        .get(..8)
        .filter(|prefix| prefix.eq_ignore_ascii_case("details "))
        .and(input.get(8..));
    if let Some(rest) = prefixed {
        return (true, rest.trim());
    }
    let split = input.len().saturating_sub(8);
    let suffixed = input
        .get(split..)
        .filter(|suffix| suffix.eq_ignore_ascii_case(" details"))
        .and(input.get(..split));
    match suffixed {
        Some(rest) => (true, rest.trim()),
        None => (false, input),
    }
}

pub fn run_line() -> Result<()> {
    let mut stdout = stdout().into_raw_mode().context("failed to enter raw mode")?;
    write!(
        stdout,
        "SuperCalc line calculator\r\n\
         Supports: +, -, *, / on decimal numbers (no parentheses, no unary minus)\r\n\
         Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history\r\n\
         Special commands: 'quit' to exit, 'clear' to reset history\r\n\
         Add 'details' before expression for step-by-step evaluation\r\n\r\n"
    )?;

    let mut history: Vec<String> = Vec::new();
    let mut history_index = 0;
    let stdin = stdin();
    let mut keys = stdin.keys();

    loop {
        write!(stdout, "{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;

        let mut expression = String::new();
        let mut cursor_pos = 0;
        let (_, initial_y) = stdout.cursor_pos()?;

        loop {
            write!(stdout, "{}{}{}{}", Goto(1, initial_y), ClearLine, PROMPT, expression)?;

            let byte_pos = char_index_to_byte_index(&expression, cursor_pos);
            let column = 1 + PROMPT.len() + expression[..byte_pos].width();
            write!(stdout, "{}", Goto(column as u16, initial_y))?;
            stdout.flush()?;

            let Some(key) = keys.next() else {
                return Ok(());
            };
            match key? {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\nGoodbye!\r\n")?;
                    return Ok(());
                }
                Key::Char(c) => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    cursor_pos += 1;
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    if let Some(c) = expression[byte_idx..].chars().next() {
                        expression.drain(byte_idx..byte_idx + c.len_utf8());
                    }
                }
                Key::Delete if cursor_pos < expression.chars().count() => {
                    let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                    if let Some(c) = expression[byte_idx..].chars().next() {
                        expression.drain(byte_idx..byte_idx + c.len_utf8());
                    }
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = expression.chars().count(),
                Key::Up => {
                    if history_index > 0 {
                        history_index -= 1;
                        expression = history[history_index].clone();
                        cursor_pos = expression.chars().count();
                    }
                }
                Key::Down => {
                    if history_index < history.len().saturating_sub(1) {
                        history_index += 1;
                        expression = history[history_index].clone();
                        cursor_pos = expression.chars().count();
                    } else {
                        history_index = history.len();
                        expression.clear();
                        cursor_pos = 0;
                    }
                }
                _ => {}
            }
        }

        let input = expression.trim();
        if input.is_empty() {
            write!(stdout, "\r\n")?;
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                info!(calculations = history.len(), "line mode stopped");
                return Ok(());
            }
            "clear" | "reset" => {
                history.clear();
                history_index = 0;
                write!(stdout, "\r\nHistory cleared\r\n\r\n")?;
                continue;
            }
            _ => {}
        }

        let (detailed_mode, processed_input) = parse_details(input);
        if processed_input.is_empty() {
            write!(stdout, "\r\nPlease enter a valid expression after 'details'\r\n")?;
            continue;
        }

        history.push(input.to_string());
        history_index = history.len();

        let mut trace = EvaluationTrace::new(detailed_mode);
        let formatted_expr = format_with_spaces(processed_input);
        match evaluate_traced(processed_input, &mut trace) {
            Ok(result) => {
                write!(stdout, "\r\n  {} = {}\r\n", formatted_expr, result)?;

                if detailed_mode && !trace.steps.is_empty() {
                    write!(stdout, "\r\n  Step-by-step evaluation:\r\n")?;
                    for (i, step) in trace.steps.iter().enumerate() {
                        write!(
                            stdout,
                            "  Step {}: {} = {}\r\n",
                            i + 1,
                            step.operation,
                            format_value(step.result)
                        )?;
                    }
                }
                write!(stdout, "\r\n")?;
            }
            Err(e) => {
                write!(stdout, "\r\n  {} = Error: {}\r\n\r\n", formatted_expr, e)?;
            }
        }
    }
}
