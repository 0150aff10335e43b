use std::fmt;
use std::iter::{Filter, Peekable};
use std::str::Chars;

use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// Binding strength; higher binds tighter. Zero is reserved for
    /// "no operator" and is never returned here.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }

    /// Division by zero follows IEEE 754 and yields an infinity or NaN.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Sub => left - right,
            Operator::Mul => left * right,
            Operator::Div => left / right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Op(Operator),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
}

/// The discriminant of an [`EvalError`], for callers that only care which
/// kind of failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    InvalidCharacter,
    MalformedNumber,
    MalformedExpression,
}

impl EvalError {
    pub fn kind(&self) -> EvalErrorKind {
        match self {
            EvalError::InvalidCharacter(_) => EvalErrorKind::InvalidCharacter,
            EvalError::MalformedNumber(_) => EvalErrorKind::MalformedNumber,
            EvalError::MalformedExpression(_) => EvalErrorKind::MalformedExpression,
        }
    }
}

pub struct Step {
    pub operation: String,
    pub result: f64,
}

pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

fn is_significant(c: &char) -> bool {
    !c.is_whitespace()
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Lazy tokenizer over an expression. Whitespace is dropped before
/// scanning, so `"1 2"` is the single literal `12`.
pub struct Tokens<'a> {
    chars: Peekable<Filter<Chars<'a>, fn(&char) -> bool>>,
}

pub fn tokenize(input: &str) -> Tokens<'_> {
    let significant: fn(&char) -> bool = is_significant;
    Tokens {
        chars: input.chars().filter(significant).peekable(),
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let c = *self.chars.peek()?;

        if is_literal_char(c) {
            let mut literal = String::new();
            while let Some(&ch) = self.chars.peek() {
                if !is_literal_char(ch) {
                    break;
                }
                literal.push(ch);
                self.chars.next();
            }
            return Some(
                literal
                    .parse::<f64>()
                    .map(Token::Number)
                    .map_err(|_| EvalError::MalformedNumber(literal)),
            );
        }

        self.chars.next();
        Some(Operator::from_char(c).map(Token::Op).ok_or(EvalError::InvalidCharacter(c)))
    }
}

struct Evaluator<'t> {
    operands: Vec<f64>,
    operators: Vec<Operator>,
    trace: &'t mut EvaluationTrace,
}

impl<'t> Evaluator<'t> {
    fn new(trace: &'t mut EvaluationTrace) -> Self {
        Evaluator {
            operands: Vec::new(),
            operators: Vec::new(),
            trace,
        }
    }

    fn top_precedence(&self) -> u8 {
        self.operators.last().map_or(0, |op| op.precedence())
    }

    fn push_operator(&mut self, op: Operator) -> Result<(), EvalError> {
        // `>=` makes operators of the same tier left-associative.
        while self.top_precedence() >= op.precedence() {
            self.apply_top()?;
        }
        self.operators.push(op);
        Ok(())
    }

    fn apply_top(&mut self) -> Result<(), EvalError> {
        let op = self.operators.pop().ok_or_else(|| {
            EvalError::MalformedExpression("no operator to apply".to_string())
        })?;
        let (Some(right), Some(left)) = (self.operands.pop(), self.operands.pop()) else {
            return Err(EvalError::MalformedExpression(format!(
                "operator '{}' is missing an operand",
                op
            )));
        };

        let result = op.apply(left, right);
        trace!(%op, left, right, result, "reduced");
        self.trace.add_step(
            format!("{} {} {}", format_value(left), op, format_value(right)),
            result,
        );
        self.operands.push(result);
        Ok(())
    }

    fn finish(mut self) -> Result<Option<f64>, EvalError> {
        while !self.operators.is_empty() {
            self.apply_top()?;
        }
        match self.operands.as_slice() {
            [] => Ok(None),
            [value] => Ok(Some(*value)),
            _ => Err(EvalError::MalformedExpression(
                "operands left without an operator".to_string(),
            )),
        }
    }
}

/// Evaluates `expression` and returns its numeric value, or `None` when the
/// input holds nothing but whitespace.
pub fn evaluate_value(
    expression: &str,
    trace: &mut EvaluationTrace,
) -> Result<Option<f64>, EvalError> {
    let mut evaluator = Evaluator::new(trace);
    for token in tokenize(expression) {
        match token? {
            Token::Number(n) => evaluator.operands.push(n),
            Token::Op(op) => evaluator.push_operator(op)?,
        }
    }
    evaluator.finish()
}

pub fn evaluate_traced(expression: &str, trace: &mut EvaluationTrace) -> Result<String, EvalError> {
    let outcome = evaluate_value(expression, trace).map(|value| value.map(format_value).unwrap_or_default());
    match &outcome {
        Ok(result) => debug!(expression, result = %result, "evaluated expression"),
        Err(e) => debug!(expression, error = %e, "evaluation failed"),
    }
    outcome
}

/// Evaluates a flat infix expression over `+ - * /` and decimal literals.
///
/// Empty or whitespace-only input yields `Ok("")`. The result is formatted
/// with [`format_value`].
pub fn evaluate(expression: &str) -> Result<String, EvalError> {
    evaluate_traced(expression, &mut EvaluationTrace::new(false))
}

/// Integer-valued results print without a fractional part, everything else
/// uses the standard `f64` formatting. Non-finite values print as
/// `Infinity`, `-Infinity` and `NaN`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        format!("{}Infinity", sign)
    } else if value == value.round() {
        if value == 0.0 {
            "0".to_string()
        } else {
            format!("{:.0}", value)
        }
    } else {
        value.to_string()
    }
}

/// Puts single spaces around operators: `"2+3*4"` becomes `"2 + 3 * 4"`.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        if Operator::from_char(c).is_some() {
            result.push(' ');
            result.push(c);
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
