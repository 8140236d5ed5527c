//! Production patterns after desugaring.

use std::fmt;
use std::sync::Arc;

use grammatica_core::{ProductionId, TokenId};

use super::lookahead::{LookAheadSet, Terminal};

/// Occurrence bounds of an element: `min..=max`, `max = None` meaning unbounded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Occurs {
    pub min: u32,
    pub max: Option<u32>,
}

impl Occurs {
    pub const ONCE: Self = Self::new(1, Some(1));
    pub const OPTIONAL: Self = Self::new(0, Some(1));
    pub const ZERO_OR_MORE: Self = Self::new(0, None);
    pub const ONE_OR_MORE: Self = Self::new(1, None);

    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn is_once(&self) -> bool {
        *self == Self::ONCE
    }

    /// `max >= 1` and `min <= max`.
    pub fn is_valid(&self) -> bool {
        match self.max {
            Some(max) => max >= 1 && self.min <= max,
            None => true,
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONCE
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (1, Some(1)) => Ok(()),
            (0, Some(1)) => f.write_str("?"),
            (0, None) => f.write_str("*"),
            (1, None) => f.write_str("+"),
            (min, None) => write!(f, "{{{},}}", min),
            (min, Some(max)) => write!(f, "{{{},{}}}", min, max),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Symbol {
    Token(TokenId),
    Production(ProductionId),
}

/// How the parser picks a branch.
///
/// Level `d` holds, per branch, the sequences of `d + 1` terminals (or fewer,
/// ending at end of input) the branch can start with. Below the first level
/// only extensions of sequences shared by several branches one level up are
/// kept, so the parser peeks further only where it has to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Decision {
    levels: Vec<Vec<LookAheadSet>>,
}

impl Decision {
    pub(crate) fn new(levels: Vec<Vec<LookAheadSet>>) -> Self {
        Self { levels }
    }

    /// Terminals to peek before every branch can be told apart.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Vec<LookAheadSet>] {
        &self.levels
    }

    /// Index of the only branch that can start with `input`.
    pub fn select(&self, input: &[Terminal]) -> Option<usize> {
        for (level, sets) in self.levels.iter().enumerate() {
            let prefix = &input[..input.len().min(level + 1)];
            let mut matching = sets
                .iter()
                .enumerate()
                .filter(|(_, set)| set.contains(prefix))
                .map(|(index, _)| index);
            let first = matching.next()?;
            if matching.next().is_none() {
                return Some(first);
            }
        }
        None
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Element {
    symbol: Symbol,
    occurs: Occurs,
    /// For optional and repeated elements: `[continue, exit]`.
    decision: Option<Decision>,
}

impl Element {
    pub(crate) fn new(symbol: Symbol, occurs: Occurs) -> Self {
        Self {
            symbol,
            occurs,
            decision: None,
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn occurs(&self) -> Occurs {
        self.occurs
    }

    pub fn min(&self) -> u32 {
        self.occurs.min
    }

    pub fn max(&self) -> Option<u32> {
        self.occurs.max
    }

    /// Whether the number of repetitions is decided by look-ahead.
    pub fn is_variable(&self) -> bool {
        self.occurs.max != Some(self.occurs.min)
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub(crate) fn set_decision(&mut self, decision: Decision) {
        self.decision = Some(decision);
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Alternative {
    elements: Vec<Element>,
}

impl Alternative {
    pub(crate) fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }
}

/// A grammar rule. Synthetic productions come from desugaring and are
/// spliced into their parent in the parse tree.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Production {
    id: ProductionId,
    name: Arc<str>,
    alternatives: Vec<Alternative>,
    /// The user-declared production this one was generated from (itself when not synthetic).
    origin: ProductionId,
    synthetic: bool,
    decision: Option<Decision>,
}

impl Production {
    pub(crate) fn declared(id: ProductionId, name: Arc<str>, alternatives: Vec<Alternative>) -> Self {
        Self {
            id,
            name,
            alternatives,
            origin: id,
            synthetic: false,
            decision: None,
        }
    }

    pub(crate) fn synthetic(
        id: ProductionId,
        name: Arc<str>,
        origin: ProductionId,
        alternatives: Vec<Alternative>,
    ) -> Self {
        Self {
            id,
            name,
            alternatives,
            origin,
            synthetic: true,
            decision: None,
        }
    }

    pub fn id(&self) -> ProductionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub(crate) fn alternatives_mut(&mut self) -> &mut [Alternative] {
        &mut self.alternatives
    }

    pub fn origin(&self) -> ProductionId {
        self.origin
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub(crate) fn set_decision(&mut self, decision: Decision) {
        self.decision = Some(decision);
    }
}
