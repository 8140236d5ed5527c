#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Grammatica tokenizer and parser.
//!
//! Everything here is immutable once constructed:
//! - **Identifiers**: `TokenId`, `ProductionId`
//! - **Lexical model**: `TokenPattern`, `Token`, `Position`
//! - **Errors**: `GrammarError` (construction time), `ParseError` (parse time)

mod error;
mod ids;
mod pattern;
mod token;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod pattern_tests;

pub use error::{GrammarError, ParseError, ParseErrorKind};
pub use ids::{ProductionId, TokenId};
pub use pattern::{DEFAULT_ERROR_MESSAGE, DEFAULT_IGNORE_MESSAGE, PatternKind, TokenPattern};
pub use token::{Position, Token};
