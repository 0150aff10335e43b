use std::time::{Duration, Instant};

use tracing::info;

use crate::calc_engine::{evaluate_traced, EvalError, EvaluationTrace, Step};

pub const KEYPAD: [[char; 4]; 4] = [
    ['7', '8', '9', '/'],
    ['4', '5', '6', '*'],
    ['1', '2', '3', '-'],
    ['0', '.', '=', '+'],
];

pub const ERROR_TEXT: &str = "Error";

pub fn is_keypad_key(key: char) -> bool {
    KEYPAD.iter().flatten().any(|&k| k == key)
}

pub struct HistoryEntry {
    pub input: String,
    pub result: Result<String, EvalError>,
    pub detailed_steps: Vec<Step>,
    pub detailed_mode: bool,
    pub duration: Duration,
}

#[derive(Default)]
pub struct Calculator {
    pub display: String,
    pub result: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub detailed_mode: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a keypad key: `=` evaluates, other keypad keys are appended
    /// and anything off the keypad is ignored.
    pub fn press(&mut self, key: char) {
        match key {
            '=' => self.evaluate(),
            _ if is_keypad_key(key) => self.display.push(key),
            _ => {}
        }
    }

    pub fn evaluate(&mut self) {
        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(self.detailed_mode);
        let result = evaluate_traced(&self.display, &mut trace);
        let duration = start_time.elapsed();

        self.result = Some(match &result {
            Ok(value) => value.clone(),
            Err(_) => ERROR_TEXT.to_string(),
        });

        if self.display.trim().is_empty() {
            return;
        }
        if let Err(e) = &result {
            info!(input = %self.display, kind = ?e.kind(), "calculation failed");
        }
        self.history.push(HistoryEntry {
            input: self.display.clone(),
            result,
            detailed_steps: trace.steps,
            detailed_mode: self.detailed_mode,
            duration,
        });
    }

    pub fn clear(&mut self) {
        self.display.clear();
        self.result = None;
    }

    pub fn delete_last(&mut self) {
        self.display.pop();
    }

    pub fn display_text(&self) -> &str {
        if self.display.is_empty() {
            "0"
        } else {
            &self.display
        }
    }

    pub fn toggle_details(&mut self) {
        self.detailed_mode = !self.detailed_mode;
    }

    /// Loads the input of history entry `index` back into the display.
    pub fn recall(&mut self, index: usize) {
        if let Some(entry) = self.history.get(index) {
            self.display = entry.input.clone();
            self.result = None;
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::EvalErrorKind;

    fn press_all(calculator: &mut Calculator, keys: &str) {
        for key in keys.chars() {
            calculator.press(key);
        }
    }

    #[test]
    fn equals_shows_result_and_keeps_display() {
        let mut calculator = Calculator::new();
        press_all(&mut calculator, "7/2=");
        assert_eq!(calculator.result.as_deref(), Some("3.5"));
        assert_eq!(calculator.display, "7/2");
        assert_eq!(calculator.history.len(), 1);
        assert_eq!(calculator.history[0].result.as_deref(), Ok("3.5"));
    }

    #[test]
    fn failures_show_error_but_keep_the_kind() {
        let mut calculator = Calculator::new();
        press_all(&mut calculator, "2++3=");
        assert_eq!(calculator.result.as_deref(), Some(ERROR_TEXT));
        let kind = calculator.history[0].result.as_ref().unwrap_err().kind();
        assert_eq!(kind, EvalErrorKind::MalformedExpression);
    }

    #[test]
    fn empty_display_shows_zero_and_is_not_recorded() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.display_text(), "0");
        calculator.press('=');
        assert_eq!(calculator.result.as_deref(), Some(""));
        assert!(calculator.history.is_empty());
    }

    #[test]
    fn clear_and_delete() {
        let mut calculator = Calculator::new();
        press_all(&mut calculator, "12+3=");
        calculator.delete_last();
        assert_eq!(calculator.display, "12+");
        assert_eq!(calculator.result.as_deref(), Some("15"));

        calculator.clear();
        assert_eq!(calculator.display, "");
        assert_eq!(calculator.result, None);
        calculator.delete_last();
        assert_eq!(calculator.display_text(), "0");
    }

    #[test]
    fn details_mode_records_steps() {
        let mut calculator = Calculator::new();
        calculator.toggle_details();
        press_all(&mut calculator, "1+2*3=");
        let entry = &calculator.history[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.detailed_steps.len(), 2);
        assert_eq!(entry.detailed_steps[0].operation, "2 * 3");
    }

    #[test]
    fn recall_loads_history_input() {
        let mut calculator = Calculator::new();
        press_all(&mut calculator, "4*4=");
        calculator.clear();
        calculator.recall(0);
        assert_eq!(calculator.display, "4*4");
        calculator.recall(5);
        assert_eq!(calculator.display, "4*4");

        calculator.clear_history();
        assert!(calculator.history.is_empty());
    }

    #[test]
    fn keys_off_the_keypad_are_ignored() {
        let mut calculator = Calculator::new();
        press_all(&mut calculator, "1q x(2)");
        assert_eq!(calculator.display, "12");
        assert!(!is_keypad_key(' '));
        assert!(is_keypad_key('.'));
    }

    #[test]
    fn keypad_keys_are_all_accepted_by_the_evaluator() {
        for key in KEYPAD.iter().flatten().filter(|&&key| key != '=') {
            let expression = format!("1{}1", key);
            assert!(crate::calc_engine::evaluate(&expression).is_ok(), "{}", expression);
        }
    }
}
