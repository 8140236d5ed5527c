//! Bounded look-ahead sets.
//!
//! A set holds terminal sequences of length at most `k`. Sequences shorter
//! than `k` are either prefixes still waiting to be extended or end with
//! [`Terminal::Eof`], after which nothing can follow.

use std::collections::BTreeSet;

use grammatica_core::TokenId;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Terminal {
    Token(TokenId),
    /// End of input.
    Eof,
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct LookAheadSet {
    sequences: BTreeSet<Vec<Terminal>>,
}

impl LookAheadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set containing only the empty sequence.
    pub fn epsilon() -> Self {
        let mut set = Self::new();
        set.sequences.insert(Vec::new());
        set
    }

    pub fn single(terminal: Terminal) -> Self {
        let mut set = Self::new();
        set.sequences.insert(vec![terminal]);
        set
    }

    pub fn insert(&mut self, sequence: Vec<Terminal>) -> bool {
        self.sequences.insert(sequence)
    }

    pub fn contains(&self, sequence: &[Terminal]) -> bool {
        self.sequences.contains(sequence)
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Terminal]> {
        self.sequences.iter().map(Vec::as_slice)
    }

    /// Whether the empty sequence is a member, i.e. the source can match nothing.
    pub fn is_nullable(&self) -> bool {
        self.sequences.contains(&Vec::new())
    }

    /// Add every sequence of `other`. Returns whether anything was added.
    pub fn union_with(&mut self, other: &LookAheadSet) -> bool {
        let before = self.sequences.len();
        self.sequences.extend(other.sequences.iter().cloned());
        self.sequences.len() != before
    }

    pub fn intersection(&self, other: &LookAheadSet) -> LookAheadSet {
        LookAheadSet {
            sequences: self
                .sequences
                .intersection(&other.sequences)
                .cloned()
                .collect(),
        }
    }

    /// `self` followed by `other`, truncated to `k`.
    ///
    /// Sequences already `k` long or ending at end of input are not extended.
    pub fn concat(&self, other: &LookAheadSet, k: usize) -> LookAheadSet {
        let mut out = LookAheadSet::new();
        if other.is_empty() {
            return out;
        }
        for head in &self.sequences {
            if is_complete(head, k) {
                out.sequences.insert(truncated(head, k));
                continue;
            }
            for tail in &other.sequences {
                let mut seq = head.clone();
                seq.extend(tail.iter().take(k - head.len()));
                out.sequences.insert(seq);
            }
        }
        out
    }

    /// Length of the longest prefix of `input` shared with some member.
    pub fn longest_prefix(&self, input: &[Terminal]) -> usize {
        self.sequences
            .iter()
            .map(|seq| {
                seq.iter()
                    .zip(input)
                    .take_while(|(a, b)| a == b)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }

    /// Terminals that may appear right after `prefix`.
    pub fn next_after(&self, prefix: &[Terminal]) -> BTreeSet<Terminal> {
        self.sequences
            .iter()
            .filter(|seq| seq.len() > prefix.len() && seq.starts_with(prefix))
            .map(|seq| seq[prefix.len()])
            .collect()
    }
}

/// A sequence that cannot grow any further under depth `k`.
pub fn is_complete(sequence: &[Terminal], k: usize) -> bool {
    sequence.len() >= k || sequence.last() == Some(&Terminal::Eof)
}

fn truncated(sequence: &[Terminal], k: usize) -> Vec<Terminal> {
    sequence[..sequence.len().min(k)].to_vec()
}
