//! Error types for grammar construction and parsing.
//!
//! The two families never mix: a `GrammarError` means the grammar itself is
//! unusable, a `ParseError` describes one problem in one input.

use crate::Position;

/// Fatal error raised while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("invalid parser configuration: {0}")]
    InvalidParser(String),

    #[error("invalid token pattern {name}: {message}")]
    InvalidToken { name: String, message: String },

    #[error("invalid production pattern {name}: {message}")]
    InvalidProduction { name: String, message: String },

    /// Left recursion or a repetition that can loop without consuming input.
    #[error("infinite loop found in production pattern {name}{}", format_cycle(.cycle))]
    InfiniteLoop { name: String, cycle: Vec<String> },

    /// Two alternatives (or a repetition and its continuation) cannot be told
    /// apart with the permitted look-ahead.
    #[error("inherent ambiguity in production pattern {name}{}", format_conflicts(.conflicts))]
    InherentAmbiguity {
        name: String,
        conflicts: Vec<String>,
    },
}

impl GrammarError {
    pub fn invalid_token(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidToken {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_production(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProduction {
            name: name.into(),
            message: message.into(),
        }
    }
}

fn format_cycle(cycle: &[String]) -> String {
    if cycle.len() < 2 {
        return String::new();
    }
    format!(" ({})", cycle.join(" -> "))
}

fn format_conflicts(conflicts: &[String]) -> String {
    if conflicts.is_empty() {
        return String::new();
    }
    format!(": conflicting look-ahead {}", conflicts.join(", "))
}

/// What went wrong during a parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected token {found}{}", format_expected(.expected))]
    UnexpectedToken { found: String, expected: Vec<String> },

    /// A pattern flagged as error matched.
    #[error("{message}: \"{image}\"")]
    InvalidToken { image: String, message: String },

    /// Raised by an analyzer callback.
    #[error("{0}")]
    Analysis(String),
}

/// Renders `, expected A`, `, expected one of A, or B`, `, expected one of A, B, or C`.
fn format_expected(expected: &[String]) -> String {
    let mut out = String::new();
    if expected.is_empty() {
        return out;
    }
    out.push_str(", expected ");
    if expected.len() > 1 {
        out.push_str("one of ");
    }
    for (i, item) in expected.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if i > 0 && i + 1 == expected.len() {
            out.push_str("or ");
        }
        out.push_str(item);
    }
    out
}

/// A single positioned parse problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}", format_position(.position))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Option<Position>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }

    pub fn at(kind: ParseErrorKind, position: Position) -> Self {
        Self::new(kind, Some(position))
    }

    pub fn io(err: &std::io::Error, position: Option<Position>) -> Self {
        Self::new(ParseErrorKind::Io(err.to_string()), position)
    }

    pub fn analysis(message: impl Into<String>, position: Option<Position>) -> Self {
        Self::new(ParseErrorKind::Analysis(message.into()), position)
    }

    pub fn internal(message: impl Into<String>, position: Option<Position>) -> Self {
        Self::new(ParseErrorKind::Internal(message.into()), position)
    }

    pub fn line(&self) -> Option<u32> {
        self.position.map(|p| p.line)
    }

    pub fn column(&self) -> Option<u32> {
        self.position.map(|p| p.column)
    }

    /// Message without the positional suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Whether the parser may skip ahead and keep going after this error.
    ///
    /// I/O and internal failures end the parse; running out of input leaves
    /// nothing to skip.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.kind,
            ParseErrorKind::Io(_) | ParseErrorKind::Internal(_) | ParseErrorKind::UnexpectedEof
        )
    }
}

fn format_position(position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!(", on line: {} column: {}", pos.line, pos.column),
        None => String::new(),
    }
}
