//! Recursive descent parser driven by the grammar's look-ahead decisions.
//!
//! # Error recovery
//!
//! An error inside an alternative is logged, one token is skipped and the
//! failed element is tried again. Until three more tokens have been matched
//! further errors are considered follow-ups and are not logged. Running out
//! of input, I/O failures and exhausted fuel end the parse.

mod descent;


use std::collections::VecDeque;
use std::io::BufRead;

use grammatica_core::{ParseError, ParseErrorKind, Position, Token};
use grammatica_lexer::Tokenizer;

use crate::analyzer::{Analyzer, TreeBuilder};
use crate::grammar::{Grammar, Terminal};
use crate::log::ParseLog;
use crate::trace::{NoopTracer, Tracer};
use crate::tree::Node;

/// Default maximum production nesting.
pub const DEFAULT_RECURSION_FUEL: u32 = 1024;

/// Tokens to match after an error before errors are logged again.
const RECOVERY_TOKENS: u32 = 3;

/// Why parsing of the current element stopped.
pub(crate) enum Halt {
    /// Recoverable at the nearest alternative.
    Error(ParseError),
    /// Already logged; unwind to the top.
    Abort,
}

impl From<ParseError> for Halt {
    fn from(error: ParseError) -> Self {
        Halt::Error(error)
    }
}

pub struct Parser<'g, R, A = TreeBuilder, T = NoopTracer> {
    grammar: &'g Grammar,
    tokenizer: Tokenizer<'g, R>,
    /// Tokens peeked but not consumed.
    buffer: VecDeque<Token>,
    /// The tokenizer reported end of input.
    exhausted: bool,
    analyzer: A,
    tracer: T,
    log: ParseLog,
    /// Tokens still to match before errors are logged again.
    recovery: u32,
    depth: u32,
    recursion_fuel: Option<u32>,
    exec_fuel: Option<u32>,
    exec_used: u32,
    error_limit: Option<usize>,
}

impl<'g, R: BufRead, A: Analyzer> Parser<'g, R, A, NoopTracer> {
    pub fn new(grammar: &'g Grammar, reader: R, analyzer: A) -> Self {
        Self {
            grammar,
            tokenizer: grammar.tokenizer(reader),
            buffer: VecDeque::new(),
            exhausted: false,
            analyzer,
            tracer: NoopTracer,
            log: ParseLog::new(),
            recovery: 0,
            depth: 0,
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
            exec_fuel: None,
            exec_used: 0,
            error_limit: None,
        }
    }
}

impl<'g, R: BufRead, A: Analyzer, T: Tracer> Parser<'g, R, A, T> {
    pub fn with_tracer<U: Tracer>(self, tracer: U) -> Parser<'g, R, A, U> {
        Parser {
            grammar: self.grammar,
            tokenizer: self.tokenizer,
            buffer: self.buffer,
            exhausted: self.exhausted,
            analyzer: self.analyzer,
            tracer,
            log: self.log,
            recovery: self.recovery,
            depth: self.depth,
            recursion_fuel: self.recursion_fuel,
            exec_fuel: self.exec_fuel,
            exec_used: self.exec_used,
            error_limit: self.error_limit,
        }
    }

    /// Maximum production nesting; `None` for no limit.
    pub fn with_recursion_fuel(mut self, fuel: Option<u32>) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    /// Maximum number of tokens consumed or skipped; `None` for no limit.
    pub fn with_exec_fuel(mut self, fuel: Option<u32>) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Stop after this many logged errors; `None` for no limit.
    pub fn with_error_limit(mut self, limit: Option<usize>) -> Self {
        self.error_limit = limit;
        self
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn analyzer_mut(&mut self) -> &mut A {
        &mut self.analyzer
    }

    pub fn into_analyzer(self) -> A {
        self.analyzer
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    /// Start over on fresh input.
    pub fn reset(&mut self, reader: R) {
        self.tokenizer.reset(reader);
        self.buffer.clear();
        self.exhausted = false;
    }

    /// Parse the whole input.
    ///
    /// Yields the start production's node, or `None` if the analyzer dropped
    /// it. Any logged error makes the parse fail with every error found.
    pub fn parse(&mut self) -> Result<Option<Node>, ParseLog> {
        self.log = ParseLog::new();
        self.recovery = 0;
        self.depth = 0;
        self.exec_used = 0;

        let root = self.parse_start();
        let log = std::mem::take(&mut self.log);
        if log.is_empty() { Ok(root) } else { Err(log) }
    }

    fn parse_start(&mut self) -> Option<Node> {
        let start = self.grammar.start();
        loop {
            match self.production(start) {
                Ok(node) => {
                    self.check_end();
                    return node;
                }
                Err(Halt::Abort) => return None,
                Err(Halt::Error(e)) => {
                    if self.add_error(e, true).is_err() {
                        return None;
                    }
                    if !matches!(self.skip(), Ok(true)) {
                        return None;
                    }
                }
            }
        }
    }

    /// Everything must be consumed by the start production.
    fn check_end(&mut self) {
        let grammar = self.grammar;
        let Ok(Some(token)) = self.peek(0) else {
            return;
        };
        let error = ParseError::at(
            ParseErrorKind::UnexpectedToken {
                found: token.short_image(),
                expected: vec![grammar.describe_terminal(Terminal::Eof)],
            },
            token.position,
        );
        let _ = self.add_error(error, true);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Token Buffer
    // ─────────────────────────────────────────────────────────────────────

    /// The token `index` positions ahead, `None` past end of input.
    ///
    /// Lexical errors met on the way are logged and the stream continues.
    fn peek(&mut self, index: usize) -> Result<Option<&Token>, Halt> {
        while self.buffer.len() <= index && !self.exhausted {
            match self.tokenizer.next() {
                Ok(Some(token)) => self.buffer.push_back(token),
                Ok(None) => self.exhausted = true,
                Err(e) => self.add_error(e, true)?,
            }
        }
        Ok(self.buffer.get(index))
    }

    fn terminal(&mut self, index: usize) -> Result<Terminal, Halt> {
        Ok(match self.peek(index)? {
            Some(token) => Terminal::Token(token.id),
            None => Terminal::Eof,
        })
    }

    /// Up to `depth` upcoming terminals, ending early at end of input.
    fn lookahead(&mut self, depth: usize) -> Result<Vec<Terminal>, Halt> {
        let mut input = Vec::with_capacity(depth);
        for index in 0..depth {
            let terminal = self.terminal(index)?;
            input.push(terminal);
            if terminal == Terminal::Eof {
                break;
            }
        }
        Ok(input)
    }

    /// Take the next token, which must already be buffered.
    fn consume(&mut self) -> Result<Token, Halt> {
        self.burn_fuel()?;
        let Some(token) = self.buffer.pop_front() else {
            return Err(self.fatal("consumed a token that was not peeked"));
        };
        self.recovery = self.recovery.saturating_sub(1);
        self.tracer.trace_consume(&token);
        Ok(token)
    }

    /// Drop the next token. `false` at end of input.
    fn skip(&mut self) -> Result<bool, Halt> {
        if self.peek(0)?.is_none() {
            return Ok(false);
        }
        self.burn_fuel()?;
        if let Some(token) = self.buffer.pop_front() {
            self.tracer.trace_skip(&token);
        }
        Ok(true)
    }

    fn burn_fuel(&mut self) -> Result<(), Halt> {
        if self.exec_fuel.is_some_and(|fuel| self.exec_used >= fuel) {
            return Err(self.fatal("execution limit exceeded"));
        }
        self.exec_used += 1;
        Ok(())
    }

    /// Position of the next token, or of the end of input.
    fn current_position(&self) -> Position {
        match self.buffer.front() {
            Some(token) => token.position,
            None => self.tokenizer.position(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Error Log
    // ─────────────────────────────────────────────────────────────────────

    /// Log `error` unless it follows another one too closely.
    ///
    /// With `recovery`, errors are suppressed until [`RECOVERY_TOKENS`]
    /// tokens have been matched. I/O and internal errors are always logged.
    /// Unrecoverable errors abort, as does reaching the error limit.
    fn add_error(&mut self, error: ParseError, recovery: bool) -> Result<(), Halt> {
        let fatal = !error.is_recoverable();
        let always = matches!(
            error.kind,
            ParseErrorKind::Io(_) | ParseErrorKind::Internal(_)
        );
        if self.recovery > 0 && !always {
            self.tracer.trace_error(&error, true);
        } else {
            self.tracer.trace_error(&error, false);
            self.log.push(error);
        }
        if recovery {
            self.recovery = RECOVERY_TOKENS;
        }

        if fatal || self.error_limit.is_some_and(|limit| self.log.len() >= limit) {
            return Err(Halt::Abort);
        }
        Ok(())
    }

    /// Log an internal error and abort.
    fn fatal(&mut self, message: &str) -> Halt {
        let error = ParseError::internal(message, Some(self.current_position()));
        let _ = self.add_error(error, false);
        Halt::Abort
    }
}
