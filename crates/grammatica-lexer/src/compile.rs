//! Token pattern compilation into automaton fragments.
//!
//! Literals become a chain of single-character steps. Regular expressions are
//! parsed with `regex-syntax` and lowered from its HIR, so the dialect (classes,
//! Unicode, counted repetition) is exactly the one of the `regex` crate, minus
//! look-around assertions, which a longest-match tokenizer cannot honour.

use grammatica_core::{GrammarError, PatternKind, TokenPattern};
use regex_syntax::ParserBuilder;
use regex_syntax::hir::{Class, Hir, HirKind};

use crate::automaton::{AutomatonBuilder, CharClass, Fragment};

/// Counted repetitions are unrolled; this bounds the unrolling.
const MAX_REPETITION: u32 = 1000;

/// Upper bound on automaton size for a single grammar.
const MAX_STATES: usize = 1 << 20;

const TOO_LARGE: &str = "pattern is too large";

pub(crate) struct PatternCompiler<'b> {
    builder: &'b mut AutomatonBuilder,
    case_insensitive: bool,
}

impl<'b> PatternCompiler<'b> {
    pub(crate) fn new(builder: &'b mut AutomatonBuilder, case_insensitive: bool) -> Self {
        Self {
            builder,
            case_insensitive,
        }
    }

    /// Compile one pattern to a fragment whose exit is the accepting state.
    pub(crate) fn compile(&mut self, pattern: &TokenPattern) -> Result<Fragment, GrammarError> {
        let invalid = |message: String| GrammarError::invalid_token(pattern.name(), message);

        let caseless = self.case_insensitive;
        let fragment = match pattern.kind() {
            PatternKind::String => self.literal(pattern.pattern(), caseless),
            PatternKind::Regexp => {
                let hir = ParserBuilder::new()
                    .case_insensitive(caseless)
                    .build()
                    .parse(pattern.pattern())
                    .map_err(|e| invalid(e.to_string()))?;
                self.hir(&hir).map_err(invalid)?
            }
        };

        if self.builder.len() > MAX_STATES {
            return Err(invalid(TOO_LARGE.to_string()));
        }
        if self.builder.epsilon_reachable(fragment.entry, fragment.exit) {
            return Err(invalid("pattern matches the empty string".to_string()));
        }
        Ok(fragment)
    }

    fn literal(&mut self, text: &str, caseless: bool) -> Fragment {
        let steps: Vec<Fragment> = text
            .chars()
            .map(|c| {
                let class = if caseless {
                    CharClass::caseless(c)
                } else {
                    CharClass::single(c)
                };
                self.builder.class_fragment(class)
            })
            .collect();
        self.builder.sequence(&steps)
    }

    fn hir(&mut self, hir: &Hir) -> Result<Fragment, String> {
        match hir.kind() {
            HirKind::Empty => Ok(self.builder.epsilon_fragment()),
            HirKind::Literal(lit) => {
                // Case folding has already been expanded into classes by the parser.
                let text = std::str::from_utf8(&lit.0)
                    .map_err(|_| "literal is not valid UTF-8".to_string())?;
                Ok(self.literal(text, false))
            }
            HirKind::Class(Class::Unicode(cls)) => {
                let ranges = cls.ranges().iter().map(|r| (r.start(), r.end())).collect();
                Ok(self.builder.class_fragment(CharClass::new(ranges)))
            }
            HirKind::Class(Class::Bytes(cls)) => {
                let ranges = cls
                    .ranges()
                    .iter()
                    .map(|r| (char::from(r.start()), char::from(r.end())))
                    .collect();
                Ok(self.builder.class_fragment(CharClass::new(ranges)))
            }
            HirKind::Look(look) => Err(format!("unsupported assertion {:?}", look)),
            HirKind::Repetition(rep) => self.repetition(&rep.sub, rep.min, rep.max),
            HirKind::Capture(cap) => self.hir(&cap.sub),
            HirKind::Concat(subs) => {
                let parts = subs
                    .iter()
                    .map(|sub| self.hir(sub))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.builder.sequence(&parts))
            }
            HirKind::Alternation(subs) => {
                let parts = subs
                    .iter()
                    .map(|sub| self.hir(sub))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.builder.alternation(&parts))
            }
        }
    }

    /// `sub{min,max}` unrolled: `min` mandatory copies, then either a loop
    /// (`max` unbounded) or `max - min` optional copies.
    fn repetition(&mut self, sub: &Hir, min: u32, max: Option<u32>) -> Result<Fragment, String> {
        if min > MAX_REPETITION || max.is_some_and(|m| m > MAX_REPETITION) {
            return Err(format!(
                "repetition count exceeds the limit of {}",
                MAX_REPETITION
            ));
        }

        let mut parts = Vec::with_capacity(max.unwrap_or(min + 1) as usize);
        for _ in 0..min {
            parts.push(self.copy(sub)?);
        }

        match max {
            None if min > 0 => {
                // Reuse the last mandatory copy as the loop body.
                if let Some(last) = parts.pop() {
                    let looped = self.builder.plus(last);
                    parts.push(looped);
                }
            }
            None => {
                let body = self.copy(sub)?;
                let looped = self.builder.star(body);
                parts.push(looped);
            }
            Some(max) => {
                for _ in min..max {
                    let body = self.copy(sub)?;
                    let opt = self.builder.optional(body);
                    parts.push(opt);
                }
            }
        }

        Ok(self.builder.sequence(&parts))
    }

    /// One unrolled copy of a repetition body. Nested counts multiply, so the
    /// size is checked after every copy instead of once at the end.
    fn copy(&mut self, sub: &Hir) -> Result<Fragment, String> {
        let fragment = self.hir(sub)?;
        if self.builder.len() > MAX_STATES {
            return Err(TOO_LARGE.to_string());
        }
        Ok(fragment)
    }
}
