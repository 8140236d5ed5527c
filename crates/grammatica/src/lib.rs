#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar-driven LL(k) parsing engine.
//!
//! The pipeline:
//! - **Grammar** (`grammar`): token patterns and productions, checked and
//!   analysed once by [`GrammarBuilder::build`]
//! - **Tokenizer** (`grammatica-lexer`): longest-match automaton over the input
//! - **Parser** (`parser`): recursive descent guided by the look-ahead
//!   decisions, feeding an [`Analyzer`] and collecting errors in a [`ParseLog`]
//!
//! ```ignore
//! let grammar = GrammarBuilder::new()
//!     .token_pattern(TokenPattern::regexp(1, "NUMBER", "[0-9]+"))
//!     .production(1, "Number", |p| p.alternative(|a| a.token(1, Occurs::ONCE)))
//!     .build()?;
//! let tree = grammar.parse_str("42")?;
//! ```

pub mod analyzer;
pub mod grammar;
pub mod log;
pub mod parser;
pub mod printer;
pub mod trace;
pub mod tree;

#[cfg(test)]
mod printer_tests;
#[cfg(test)]
mod test_grammars;
#[cfg(test)]
mod tree_tests;

pub use analyzer::{Analyzer, TreeBuilder};
pub use grammar::{
    AlternativeBuilder, Grammar, GrammarBuilder, LookAheadSet, Occurs, ProductionBuilder, Terminal,
};
pub use log::ParseLog;
pub use parser::{DEFAULT_RECURSION_FUEL, Parser};
pub use printer::LogPrinter;
pub use trace::{NoopTracer, PrintTracer, Tracer};
pub use tree::{Node, ProductionNode, TokenNode};

pub use grammatica_core::{
    GrammarError, ParseError, ParseErrorKind, Position, ProductionId, Token, TokenId,
    TokenPattern,
};
pub use grammatica_lexer::{Lexicon, Tokenizer};
