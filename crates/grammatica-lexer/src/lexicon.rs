//! The compiled set of token patterns.

use grammatica_core::{GrammarError, ParseError, Token, TokenId, TokenPattern};
use indexmap::IndexMap;
use std::io::BufRead;

use crate::automaton::{Automaton, AutomatonBuilder};
use crate::compile::PatternCompiler;
use crate::tokenizer::Tokenizer;

/// Token patterns in declaration order plus the automaton recognising all of them.
///
/// Immutable once built; any number of tokenizers may share one lexicon.
#[derive(Debug, Clone)]
pub struct Lexicon {
    patterns: IndexMap<TokenId, TokenPattern>,
    automaton: Automaton,
}

impl Lexicon {
    /// Compile `patterns`. Declaration order decides ties between equally long matches.
    pub fn new(
        patterns: impl IntoIterator<Item = TokenPattern>,
        case_insensitive: bool,
    ) -> Result<Self, GrammarError> {
        let mut by_id = IndexMap::new();
        for pattern in patterns {
            if pattern.name().is_empty() {
                return Err(GrammarError::invalid_token(
                    format!("#{}", pattern.id()),
                    "missing name",
                ));
            }
            if pattern.pattern().is_empty() {
                return Err(GrammarError::invalid_token(
                    pattern.name(),
                    "pattern matches the empty string",
                ));
            }
            if by_id.contains_key(&pattern.id()) {
                return Err(GrammarError::invalid_token(
                    pattern.name(),
                    format!("duplicate token id {}", pattern.id()),
                ));
            }
            by_id.insert(pattern.id(), pattern);
        }
        if by_id.is_empty() {
            return Err(GrammarError::InvalidParser(
                "no token patterns defined".to_string(),
            ));
        }

        let mut builder = AutomatonBuilder::new();
        let start = builder.add_state();
        for (index, pattern) in by_id.values().enumerate() {
            let fragment = PatternCompiler::new(&mut builder, case_insensitive).compile(pattern)?;
            builder.connect_epsilon(start, fragment.entry);
            builder.accept(fragment.exit, index);
        }

        Ok(Self {
            patterns: by_id,
            automaton: builder.finish(start),
        })
    }

    pub fn pattern(&self, id: TokenId) -> Option<&TokenPattern> {
        self.patterns.get(&id)
    }

    /// Pattern by declaration index, as reported by the automaton.
    pub fn pattern_at(&self, index: usize) -> Option<&TokenPattern> {
        self.patterns.get_index(index).map(|(_, p)| p)
    }

    /// Declaration index of `id`.
    pub fn index_of(&self, id: TokenId) -> Option<usize> {
        self.patterns.get_index_of(&id)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &TokenPattern> {
        self.patterns.values()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `"lit"` or `<NAME>`; unknown ids render as `#id`.
    pub fn describe(&self, id: TokenId) -> String {
        match self.pattern(id) {
            Some(pattern) => pattern.description(),
            None => format!("#{}", id),
        }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn tokenizer<R: BufRead>(&self, reader: R) -> Tokenizer<'_, R> {
        Tokenizer::new(self, reader)
    }

    /// Tokenize a whole string, stopping at the first error.
    pub fn tokenize_str(&self, text: &str) -> Result<Vec<Token>, ParseError> {
        self.tokenizer(text.as_bytes()).tokenize_all()
    }
}
