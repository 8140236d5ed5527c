//! Generation-ordered queue of automaton states.
//!
//! The NFA simulation keeps one queue. States for the current input
//! character sit in front of `mark`; successors produced while processing
//! them are appended behind it and form the next generation.
//!
//! ```text
//!   consumed     current generation   next generation    free
//! [ ....... | first ........ mark | ............. last | .... ]
//! ```
//!
//! Invariant: `first <= mark <= last <= buf.len()`.
//! Storage is a single buffer; when it fills up and at least half of it lies
//! behind `first`, the live part is shifted to the front instead of growing.

use crate::automaton::StateId;

#[derive(Debug, Clone, Default)]
pub struct StateQueue {
    buf: Vec<StateId>,
    first: usize,
    mark: usize,
    last: usize,
    generation: u32,
}

impl StateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of queued states, across both generations.
    pub fn len(&self) -> usize {
        self.last - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }

    /// True when the next removal would take a state of the next generation.
    pub fn marked(&self) -> bool {
        self.first == self.mark
    }

    /// Generation of the states in front of `mark`.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn add_last(&mut self, state: StateId) {
        if self.last == self.buf.len() {
            if self.first > 0 && self.first >= self.buf.len() / 2 {
                self.compact();
            } else {
                self.buf.push(state);
                self.last += 1;
                return;
            }
        }
        self.buf[self.last] = state;
        self.last += 1;
    }

    pub fn remove_first(&mut self) -> Option<StateId> {
        if self.is_empty() {
            return None;
        }
        let state = self.buf[self.first];
        self.first += 1;
        if self.mark < self.first {
            self.mark = self.first;
        }
        Some(state)
    }

    /// Close the current generation: everything queued so far belongs to it.
    pub fn mark_end(&mut self) {
        self.mark = self.last;
        self.generation = self.generation.wrapping_add(1);
    }

    /// O(1) reset. The buffer is kept for reuse.
    pub fn clear(&mut self) {
        self.first = 0;
        self.mark = 0;
        self.last = 0;
    }

    fn compact(&mut self) {
        self.buf.copy_within(self.first..self.last, 0);
        self.last -= self.first;
        self.mark -= self.first;
        self.first = 0;
    }

    /// Cursor snapshot `(first, mark, last)`, for invariant checks.
    pub fn cursors(&self) -> (usize, usize, usize) {
        (self.first, self.mark, self.last)
    }
}
