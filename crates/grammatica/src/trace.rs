//! Tracing infrastructure for debugging parser decisions.
//!
//! `NoopTracer` is the default and compiles to nothing: every method is an
//! `#[inline(always)]` empty function. `PrintTracer` resolves ids through the
//! grammar and collects one indented line per event.

use grammatica_core::{ParseError, ProductionId, Token};

use crate::grammar::Grammar;

/// Parser instrumentation.
///
/// Methods receive the raw data the parser already has; name resolution
/// and formatting happen in the implementation.
pub trait Tracer {
    /// Called before selecting an alternative of a production.
    fn trace_enter(&mut self, production: ProductionId);

    /// Called once an alternative is chosen; `depth` is the look-ahead used.
    fn trace_alternative(&mut self, production: ProductionId, alternative: usize, depth: usize);

    /// Called after a token is matched and consumed.
    fn trace_consume(&mut self, token: &Token);

    /// Called when an optional or repeated element decides whether to match again.
    fn trace_loop(&mut self, production: ProductionId, count: u32, again: bool);

    /// Called for every error, including those suppressed during recovery.
    fn trace_error(&mut self, error: &ParseError, suppressed: bool);

    /// Called when a token is skipped during error recovery.
    fn trace_skip(&mut self, token: &Token);

    /// Called when a production completes.
    fn trace_exit(&mut self, production: ProductionId);
}

/// No-op tracer that gets optimized away completely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _production: ProductionId) {}

    #[inline(always)]
    fn trace_alternative(&mut self, _production: ProductionId, _alternative: usize, _depth: usize) {}

    #[inline(always)]
    fn trace_consume(&mut self, _token: &Token) {}

    #[inline(always)]
    fn trace_loop(&mut self, _production: ProductionId, _count: u32, _again: bool) {}

    #[inline(always)]
    fn trace_error(&mut self, _error: &ParseError, _suppressed: bool) {}

    #[inline(always)]
    fn trace_skip(&mut self, _token: &Token) {}

    #[inline(always)]
    fn trace_exit(&mut self, _production: ProductionId) {}
}

/// Tracer that collects a readable trace.
pub struct PrintTracer<'g> {
    grammar: &'g Grammar,
    lines: Vec<String>,
    depth: usize,
}

impl<'g> PrintTracer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            lines: Vec::new(),
            depth: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Write the collected lines to stderr.
    pub fn print(&self) {
        for line in &self.lines {
            eprintln!("{}", line);
        }
    }

    fn push(&mut self, text: String) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), text));
    }

    fn production_name(&self, id: ProductionId) -> &'g str {
        self.grammar.production(id).map_or("?", |p| p.name())
    }

    fn token_name(&self, token: &Token) -> &'g str {
        self.grammar.token_pattern(token.id).map_or("?", |p| p.name())
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_enter(&mut self, production: ProductionId) {
        let name = self.production_name(production);
        self.push(format!("enter {}", name));
        self.depth += 1;
    }

    fn trace_alternative(&mut self, production: ProductionId, alternative: usize, depth: usize) {
        let name = self.production_name(production);
        self.push(format!("alternative {} of {} (k={})", alternative + 1, name, depth));
    }

    fn trace_consume(&mut self, token: &Token) {
        let name = self.token_name(token);
        self.push(format!(
            "consume {} {} {}:{}",
            name,
            token.short_image(),
            token.line(),
            token.column()
        ));
    }

    fn trace_loop(&mut self, production: ProductionId, count: u32, again: bool) {
        let name = self.production_name(production);
        let verdict = if again { "again" } else { "done" };
        self.push(format!("loop {} after {}: {}", name, count, verdict));
    }

    fn trace_error(&mut self, error: &ParseError, suppressed: bool) {
        let suffix = if suppressed { " (suppressed)" } else { "" };
        self.push(format!("error {}{}", error, suffix));
    }

    fn trace_skip(&mut self, token: &Token) {
        let name = self.token_name(token);
        self.push(format!("skip {} {}", name, token.short_image()));
    }

    fn trace_exit(&mut self, production: ProductionId) {
        self.depth = self.depth.saturating_sub(1);
        let name = self.production_name(production);
        self.push(format!("exit {}", name));
    }
}
