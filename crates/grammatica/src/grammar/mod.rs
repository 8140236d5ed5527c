//! Grammar construction and static analysis.
//!
//! A [`Grammar`] is immutable once built and can be shared by any number of
//! parsers.

mod analysis;
mod builder;
mod desugar;
mod lookahead;
mod production;

#[cfg(test)]
mod analysis_tests;

use std::fmt::Write;
use std::io::BufRead;

use grammatica_core::{ProductionId, TokenId, TokenPattern};
use grammatica_lexer::{Lexicon, Tokenizer};
use indexmap::IndexMap;

pub use builder::{AlternativeBuilder, DEFAULT_MAX_LOOKAHEAD, GrammarBuilder, ProductionBuilder};
pub use lookahead::{LookAheadSet, Terminal};
pub use production::{Alternative, Decision, Element, Occurs, Production, Symbol};

use crate::analyzer::{Analyzer, TreeBuilder};
use crate::log::ParseLog;
use crate::parser::Parser;
use crate::tree::Node;

#[derive(Debug, Clone)]
pub struct Grammar {
    lexicon: Lexicon,
    productions: IndexMap<ProductionId, Production>,
    start: ProductionId,
    max_lookahead: usize,
}

impl Grammar {
    pub(crate) fn new(
        lexicon: Lexicon,
        productions: IndexMap<ProductionId, Production>,
        start: ProductionId,
        max_lookahead: usize,
    ) -> Self {
        Self {
            lexicon,
            productions,
            start,
            max_lookahead,
        }
    }

    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn token_pattern(&self, id: TokenId) -> Option<&TokenPattern> {
        self.lexicon.pattern(id)
    }

    pub fn production(&self, id: ProductionId) -> Option<&Production> {
        self.productions.get(&id)
    }

    /// Declared productions first, in declaration order, then synthetic ones.
    pub fn productions(&self) -> impl Iterator<Item = &Production> {
        self.productions.values()
    }

    pub fn start(&self) -> ProductionId {
        self.start
    }

    pub fn max_lookahead(&self) -> usize {
        self.max_lookahead
    }

    /// `"lit"`, `<NAME>` or `<EOF>`.
    pub fn describe_terminal(&self, terminal: Terminal) -> String {
        analysis::describe_terminal(&self.lexicon, terminal)
    }

    pub fn tokenizer<R: BufRead>(&self, reader: R) -> Tokenizer<'_, R> {
        self.lexicon.tokenizer(reader)
    }

    pub fn parser<R: BufRead, A: Analyzer>(&self, reader: R, analyzer: A) -> Parser<'_, R, A> {
        Parser::new(self, reader, analyzer)
    }

    /// Parse `text` into a full tree.
    pub fn parse_str(&self, text: &str) -> Result<Node, ParseLog> {
        let mut parser = self.parser(text.as_bytes(), TreeBuilder);
        match parser.parse()? {
            Some(node) => Ok(node),
            None => Err(ParseLog::internal("analyzer discarded the root node")),
        }
    }

    /// Productions, alternatives and the look-ahead depth of every decision.
    ///
    /// ```text
    /// List [k=1]
    ///   = <NUMBER> List#1*[k=1]
    /// List#1 (synthetic)
    ///   = "," <NUMBER>
    /// ```
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for production in self.productions.values() {
            out.push_str(production.name());
            if production.is_synthetic() {
                out.push_str(" (synthetic)");
            }
            if let Some(decision) = production.decision() {
                let _ = write!(out, " [k={}]", decision.depth());
            }
            out.push('\n');

            for (i, alternative) in production.alternatives().iter().enumerate() {
                out.push_str(if i == 0 { "  =" } else { "  |" });
                for element in alternative.elements() {
                    out.push(' ');
                    self.write_element(&mut out, element);
                }
                out.push('\n');
            }
        }
        out
    }

    fn write_element(&self, out: &mut String, element: &Element) {
        match element.symbol() {
            Symbol::Token(id) => out.push_str(&self.lexicon.describe(id)),
            Symbol::Production(id) => match self.production(id) {
                Some(p) => out.push_str(p.name()),
                None => {
                    let _ = write!(out, "#{}", id);
                }
            },
        }
        let _ = write!(out, "{}", element.occurs());
        if let Some(decision) = element.decision() {
            let _ = write!(out, "[k={}]", decision.depth());
        }
    }
}
