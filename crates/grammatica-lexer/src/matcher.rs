//! Longest-match simulation of the automaton.
//!
//! All active states advance in lockstep, one input character per
//! generation. The simulation stops when the queue runs dry or the input
//! ends; the last generation that reached an accepting state wins. Among
//! patterns accepting at the same length, the lowest index wins.

use std::io;

use crate::automaton::{Automaton, StateId};
use crate::state_queue::StateQueue;

/// Random-access character input, read lazily.
pub trait CharSource {
    /// Character `offset` positions ahead of the current one, or `None` at end of input.
    fn peek(&mut self, offset: usize) -> io::Result<Option<char>>;
}

impl CharSource for &[char] {
    fn peek(&mut self, offset: usize) -> io::Result<Option<char>> {
        Ok(self.get(offset).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Length in characters.
    pub len: usize,
    /// Index of the winning pattern.
    pub pattern: usize,
}

/// Reusable simulation state. One per tokenizer.
#[derive(Debug, Default)]
pub struct NfaMatcher {
    queue: StateQueue,
    /// Stamp of the generation that last visited each state.
    seen: Vec<u32>,
    stamp: u32,
    stack: Vec<StateId>,
}

impl NfaMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn longest_match<S: CharSource + ?Sized>(
        &mut self,
        automaton: &Automaton,
        input: &mut S,
    ) -> io::Result<Option<Match>> {
        if self.seen.len() < automaton.len() {
            self.seen.resize(automaton.len(), 0);
        }
        self.queue.clear();
        self.next_stamp();
        // Patterns never match the empty string, so the start closure accepts nothing.
        self.enqueue_closure(automaton, automaton.start());

        let mut best = None;
        let mut len = 0;
        while !self.queue.is_empty() {
            let Some(c) = input.peek(len)? else {
                break;
            };

            self.queue.mark_end();
            self.next_stamp();
            let mut accept: Option<usize> = None;
            while !self.queue.marked() {
                let Some(id) = self.queue.remove_first() else {
                    break;
                };
                for transition in automaton.state(id).transitions() {
                    if !transition.class.contains(c) {
                        continue;
                    }
                    if let Some(found) = self.enqueue_closure(automaton, transition.target) {
                        accept = Some(accept.map_or(found, |a| a.min(found)));
                    }
                }
            }

            len += 1;
            if let Some(pattern) = accept {
                best = Some(Match { len, pattern });
            }
        }

        Ok(best)
    }

    /// Queue every state in the epsilon closure of `from` that has not been
    /// visited in this generation. Returns the best pattern accepted on the way.
    fn enqueue_closure(&mut self, automaton: &Automaton, from: StateId) -> Option<usize> {
        let mut accept: Option<usize> = None;
        self.stack.clear();
        self.stack.push(from);
        while let Some(id) = self.stack.pop() {
            let slot = &mut self.seen[id as usize];
            if *slot == self.stamp {
                continue;
            }
            *slot = self.stamp;

            let state = automaton.state(id);
            if let Some(found) = state.accept() {
                accept = Some(accept.map_or(found, |a| a.min(found)));
            }
            if !state.transitions().is_empty() {
                self.queue.add_last(id);
            }
            self.stack.extend(state.epsilons());
        }
        accept
    }

    fn next_stamp(&mut self) {
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.seen.fill(0);
            self.stamp = 1;
        }
    }
}
