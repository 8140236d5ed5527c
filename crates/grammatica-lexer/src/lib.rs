#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Automaton-based tokenizer.
//!
//! Token patterns (literals and regular expressions) are compiled into one
//! nondeterministic automaton. The tokenizer simulates it over the input and
//! always takes the longest match, preferring the earliest declared pattern
//! on ties.

mod automaton;
mod compile;
mod lexicon;
mod matcher;
mod reader;
mod state_queue;
mod tokenizer;

#[cfg(test)]
mod state_queue_tests;
#[cfg(test)]
mod tokenizer_tests;

pub use automaton::{Automaton, AutomatonBuilder, CharClass, Fragment, State, StateId, Transition};
pub use lexicon::Lexicon;
pub use matcher::{CharSource, Match, NfaMatcher};
pub use reader::CharReader;
pub use state_queue::StateQueue;
pub use tokenizer::Tokenizer;
