//! Identifier newtypes.
//!
//! Token and production ids are chosen by whoever declares the grammar.
//! They live in separate namespaces, so the same number may name a token
//! and a production without conflict.

use std::fmt;

use serde::Serialize;

/// Identifier of a token pattern.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TokenId(pub u32);

/// Identifier of a production pattern.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ProductionId(pub u32);

impl ProductionId {
    /// The id following this one. Used when allocating synthetic productions.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for TokenId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<u32> for ProductionId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProductionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
