//! Declarative grammar construction.
//!
//! ```ignore
//! let grammar = GrammarBuilder::new()
//!     .token_pattern(TokenPattern::regexp(NUMBER, "NUMBER", "[0-9]+"))
//!     .token_pattern(TokenPattern::string(COMMA, "COMMA", ","))
//!     .production(LIST, "List", |p| {
//!         p.alternative(|a| {
//!             a.token(NUMBER, Occurs::ONCE)
//!                 .group(Occurs::ZERO_OR_MORE, |g| {
//!                     g.alternative(|a| a.token(COMMA, Occurs::ONCE).token(NUMBER, Occurs::ONCE))
//!                 })
//!         })
//!     })
//!     .build()?;
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use grammatica_core::{GrammarError, ProductionId, TokenId, TokenPattern};
use grammatica_lexer::Lexicon;

use super::Grammar;
use super::analysis;
use super::desugar;
use super::production::Occurs;

pub const DEFAULT_MAX_LOOKAHEAD: usize = 4;

#[derive(Clone, Debug)]
pub(crate) enum Item {
    Token(TokenId),
    Production(ProductionId),
    Group(Vec<Vec<DeclaredElement>>),
}

#[derive(Clone, Debug)]
pub(crate) struct DeclaredElement {
    pub(crate) item: Item,
    pub(crate) occurs: Occurs,
}

#[derive(Clone, Debug)]
pub(crate) struct DeclaredProduction {
    pub(crate) id: ProductionId,
    pub(crate) name: Arc<str>,
    pub(crate) alternatives: Vec<Vec<DeclaredElement>>,
}

#[derive(Debug)]
pub struct GrammarBuilder {
    patterns: Vec<TokenPattern>,
    productions: Vec<DeclaredProduction>,
    max_lookahead: usize,
    case_insensitive: bool,
    start: Option<ProductionId>,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            productions: Vec::new(),
            max_lookahead: DEFAULT_MAX_LOOKAHEAD,
            case_insensitive: false,
            start: None,
        }
    }

    pub fn token_pattern(mut self, pattern: TokenPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Declare a production; `f` adds its alternatives.
    pub fn production(
        mut self,
        id: impl Into<ProductionId>,
        name: impl Into<Arc<str>>,
        f: impl FnOnce(ProductionBuilder) -> ProductionBuilder,
    ) -> Self {
        let alternatives = f(ProductionBuilder::default()).alternatives;
        self.productions.push(DeclaredProduction {
            id: id.into(),
            name: name.into(),
            alternatives,
        });
        self
    }

    /// Upper bound for the look-ahead depth of any decision.
    pub fn max_lookahead(mut self, k: usize) -> Self {
        self.max_lookahead = k;
        self
    }

    pub fn case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }

    /// Production the parser starts from. Defaults to the first declared one.
    pub fn start(mut self, id: impl Into<ProductionId>) -> Self {
        self.start = Some(id.into());
        self
    }

    pub fn build(mut self) -> Result<Grammar, GrammarError> {
        if self.max_lookahead == 0 {
            return Err(GrammarError::InvalidParser(
                "look-ahead depth must be at least 1".to_string(),
            ));
        }

        let patterns = std::mem::take(&mut self.patterns);
        let lexicon = Lexicon::new(patterns, self.case_insensitive)?;
        self.validate(&lexicon)?;

        let Some(start) = self.start.or_else(|| self.productions.first().map(|p| p.id)) else {
            return Err(GrammarError::InvalidParser(
                "no production patterns defined".to_string(),
            ));
        };
        if !self.productions.iter().any(|p| p.id == start) {
            return Err(GrammarError::InvalidParser(format!(
                "start production {} is not defined",
                start
            )));
        }

        let mut productions = desugar::lower(&self.productions);
        analysis::analyze(&mut productions, start, self.max_lookahead, &lexicon)?;

        Ok(Grammar::new(lexicon, productions, start, self.max_lookahead))
    }

    fn validate(&self, lexicon: &Lexicon) -> Result<(), GrammarError> {
        if self.productions.is_empty() {
            return Err(GrammarError::InvalidParser(
                "no production patterns defined".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for production in &self.productions {
            if production.name.is_empty() {
                return Err(GrammarError::invalid_production(
                    format!("#{}", production.id),
                    "missing name",
                ));
            }
            if !ids.insert(production.id) {
                return Err(GrammarError::invalid_production(
                    production.name.as_ref(),
                    format!("duplicate production id {}", production.id),
                ));
            }
        }

        for production in &self.productions {
            let validator = Validator {
                lexicon,
                ids: &ids,
                name: &production.name,
            };
            validator.alternatives(&production.alternatives)?;
        }
        Ok(())
    }
}

struct Validator<'a> {
    lexicon: &'a Lexicon,
    ids: &'a HashSet<ProductionId>,
    name: &'a str,
}

impl Validator<'_> {
    fn error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::invalid_production(self.name, message)
    }

    fn alternatives(&self, alternatives: &[Vec<DeclaredElement>]) -> Result<(), GrammarError> {
        if alternatives.is_empty() {
            return Err(self.error("no alternatives defined"));
        }
        for (index, elements) in alternatives.iter().enumerate() {
            if elements.is_empty() {
                return Err(self.error(format!("alternative {} has no elements", index + 1)));
            }
            for element in elements {
                self.element(element)?;
            }
        }
        Ok(())
    }

    fn element(&self, element: &DeclaredElement) -> Result<(), GrammarError> {
        if !element.occurs.is_valid() {
            return Err(self.error(format!(
                "invalid occurrence bounds {{{},{}}}",
                element.occurs.min,
                element
                    .occurs
                    .max
                    .map_or_else(String::new, |max| max.to_string())
            )));
        }
        match &element.item {
            Item::Token(id) if self.lexicon.pattern(*id).is_none() => {
                Err(self.error(format!("undefined token {}", id)))
            }
            Item::Production(id) if !self.ids.contains(id) => {
                Err(self.error(format!("undefined production {}", id)))
            }
            Item::Group(alternatives) => self.alternatives(alternatives),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProductionBuilder {
    alternatives: Vec<Vec<DeclaredElement>>,
}

impl ProductionBuilder {
    pub fn alternative(mut self, f: impl FnOnce(AlternativeBuilder) -> AlternativeBuilder) -> Self {
        self.alternatives.push(f(AlternativeBuilder::default()).elements);
        self
    }
}

#[derive(Debug, Default)]
pub struct AlternativeBuilder {
    elements: Vec<DeclaredElement>,
}

impl AlternativeBuilder {
    pub fn token(self, id: impl Into<TokenId>, occurs: Occurs) -> Self {
        self.push(Item::Token(id.into()), occurs)
    }

    pub fn production(self, id: impl Into<ProductionId>, occurs: Occurs) -> Self {
        self.push(Item::Production(id.into()), occurs)
    }

    /// Nested alternatives, as with parentheses in EBNF.
    pub fn group(
        self,
        occurs: Occurs,
        f: impl FnOnce(ProductionBuilder) -> ProductionBuilder,
    ) -> Self {
        let alternatives = f(ProductionBuilder::default()).alternatives;
        self.push(Item::Group(alternatives), occurs)
    }

    fn push(mut self, item: Item, occurs: Occurs) -> Self {
        self.elements.push(DeclaredElement { item, occurs });
        self
    }
}
