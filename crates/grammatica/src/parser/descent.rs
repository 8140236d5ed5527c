use std::collections::BTreeSet;
use std::io::BufRead;

use grammatica_core::{ParseError, ParseErrorKind, ProductionId, TokenId};

use super::{Halt, Parser};
use crate::analyzer::Analyzer;
use crate::grammar::{Decision, Element, Production, Symbol, Terminal};
use crate::trace::Tracer;
use crate::tree::{Node, ProductionNode, TokenNode};

impl<'g, R: BufRead, A: Analyzer, T: Tracer> Parser<'g, R, A, T> {
    /// Parse a declared production into a node.
    pub(super) fn production(&mut self, id: ProductionId) -> Result<Option<Node>, Halt> {
        let grammar = self.grammar;
        let Some(production) = grammar.production(id) else {
            return Err(self.fatal("reference to an unknown production"));
        };

        let mut node = ProductionNode::new(id, production.shared_name());
        if let Err(e) = self.analyzer.enter(&Node::Production(node.clone())) {
            self.add_error(e, false)?;
        }
        self.alternatives(production, &mut node)?;
        self.exit(Node::Production(node))
    }

    /// Pick an alternative of `production` and parse it, adding the results to `parent`.
    ///
    /// Synthetic productions come straight here, so their children land in
    /// the enclosing declared production.
    fn alternatives(
        &mut self,
        production: &'g Production,
        parent: &mut ProductionNode,
    ) -> Result<(), Halt> {
        if self.recursion_fuel.is_some_and(|fuel| self.depth >= fuel) {
            return Err(self.fatal("recursion limit exceeded"));
        }

        self.depth += 1;
        self.tracer.trace_enter(production.id());
        let result = self.alternatives_inner(production, parent);
        self.tracer.trace_exit(production.id());
        self.depth -= 1;
        result
    }

    fn alternatives_inner(
        &mut self,
        production: &'g Production,
        parent: &mut ProductionNode,
    ) -> Result<(), Halt> {
        let (index, depth) = match production.decision() {
            None => (0, 0),
            Some(decision) => {
                let input = self.lookahead(decision.depth())?;
                match decision.select(&input) {
                    Some(index) => (index, decision.depth()),
                    None => return Err(Halt::Error(self.mismatch(decision, &input))),
                }
            }
        };
        let Some(alternative) = production.alternatives().get(index) else {
            return Err(self.fatal("selected alternative out of range"));
        };
        self.tracer.trace_alternative(production.id(), index, depth);

        for element in alternative.elements() {
            // Copies matched before an error still count after recovery.
            let mut count = 0;
            loop {
                match self.element(element, parent, &mut count) {
                    Ok(()) => break,
                    Err(Halt::Abort) => return Err(Halt::Abort),
                    Err(Halt::Error(e)) => {
                        self.add_error(e, true)?;
                        if !self.skip()? {
                            return Err(Halt::Abort);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn element(
        &mut self,
        element: &'g Element,
        parent: &mut ProductionNode,
        count: &mut u32,
    ) -> Result<(), Halt> {
        loop {
            if element.max().is_some_and(|max| *count >= max) {
                break;
            }
            if *count >= element.min() {
                let again = match element.decision() {
                    Some(decision) => {
                        let input = self.lookahead(decision.depth())?;
                        decision.select(&input) == Some(0)
                    }
                    None => false,
                };
                if let Symbol::Production(id) = element.symbol() {
                    self.tracer.trace_loop(id, *count, again);
                }
                if !again {
                    break;
                }
            }
            self.symbol(element.symbol(), parent)?;
            *count += 1;
        }
        Ok(())
    }

    fn symbol(&mut self, symbol: Symbol, parent: &mut ProductionNode) -> Result<(), Halt> {
        let id = match symbol {
            Symbol::Token(id) => return self.token(id, parent),
            Symbol::Production(id) => id,
        };

        let grammar = self.grammar;
        let Some(production) = grammar.production(id) else {
            return Err(self.fatal("reference to an unknown production"));
        };
        if production.is_synthetic() {
            return self.alternatives(production, parent);
        }
        match self.production(id)? {
            Some(node) => self.attach(parent, node),
            None => Ok(()),
        }
    }

    fn token(&mut self, id: TokenId, parent: &mut ProductionNode) -> Result<(), Halt> {
        let grammar = self.grammar;
        match self.peek(0)?.map(|token| token.id) {
            None => return Err(Halt::Error(self.eof_error())),
            Some(found) if found != id => {
                let expected = vec![grammar.lexicon().describe(id)];
                return Err(Halt::Error(self.unexpected(0, expected)));
            }
            Some(_) => {}
        }

        let token = self.consume()?;
        let name = grammar
            .token_pattern(id)
            .map(|pattern| pattern.shared_name())
            .unwrap_or_else(|| id.to_string().into());
        let node = Node::Token(TokenNode::new(token, name));
        if let Err(e) = self.analyzer.enter(&node) {
            self.add_error(e, false)?;
        }
        match self.exit(node)? {
            Some(node) => self.attach(parent, node),
            None => Ok(()),
        }
    }

    fn exit(&mut self, node: Node) -> Result<Option<Node>, Halt> {
        match self.analyzer.exit(node) {
            Ok(node) => Ok(node),
            Err(e) => {
                self.add_error(e, false)?;
                Ok(None)
            }
        }
    }

    fn attach(&mut self, parent: &mut ProductionNode, node: Node) -> Result<(), Halt> {
        if let Err(e) = self.analyzer.child(parent, node) {
            self.add_error(e, false)?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────────────────

    /// Error for `input` selecting no branch of `decision`.
    ///
    /// Points at the first token no look-ahead sequence can continue with,
    /// listing the tokens that could have been there.
    fn mismatch(&self, decision: &Decision, input: &[Terminal]) -> ParseError {
        let sets = || decision.levels().iter().flatten();
        let prefix = sets()
            .map(|set| set.longest_prefix(input))
            .max()
            .unwrap_or(0);

        let mut next = BTreeSet::new();
        for set in sets() {
            next.extend(set.next_after(&input[..prefix]));
        }

        match input.get(prefix) {
            Some(Terminal::Token(_)) => {
                let lexicon = self.grammar.lexicon();
                let mut ids: Vec<TokenId> = next
                    .into_iter()
                    .filter_map(|terminal| match terminal {
                        Terminal::Token(id) => Some(id),
                        Terminal::Eof => None,
                    })
                    .collect();
                ids.sort_by_key(|id| lexicon.index_of(*id));
                let expected = ids.into_iter().map(|id| lexicon.describe(id)).collect();
                self.unexpected(prefix, expected)
            }
            Some(Terminal::Eof) | None => self.eof_error(),
        }
    }

    /// `UnexpectedToken` at the buffered token `index`.
    fn unexpected(&self, index: usize, expected: Vec<String>) -> ParseError {
        match self.buffer.get(index) {
            Some(token) => ParseError::at(
                ParseErrorKind::UnexpectedToken {
                    found: token.short_image(),
                    expected,
                },
                token.position,
            ),
            None => self.eof_error(),
        }
    }

    fn eof_error(&self) -> ParseError {
        ParseError::at(ParseErrorKind::UnexpectedEof, self.tokenizer.position())
    }
}
