//! Nondeterministic automaton over characters.
//!
//! States live in a flat vector and refer to each other by `StateId`, so the
//! (cyclic) graph has a single owner and can be shared read-only between
//! tokenizers. Construction goes through [`AutomatonBuilder`], whose fragment
//! combinators follow the usual Thompson construction.

/// Index into `Automaton::states`.
pub type StateId = u32;

/// Sorted, non-overlapping set of inclusive character ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    ranges: Box<[(char, char)]>,
}

impl CharClass {
    pub fn new(mut ranges: Vec<(char, char)>) -> Self {
        ranges.retain(|(lo, hi)| lo <= hi);
        ranges.sort_unstable();

        let mut merged: Vec<(char, char)> = Vec::with_capacity(ranges.len());
        for (lo, hi) in ranges {
            if let Some(prev) = merged.last_mut() {
                if (lo as u32) <= (prev.1 as u32).saturating_add(1) {
                    prev.1 = prev.1.max(hi);
                    continue;
                }
            }
            merged.push((lo, hi));
        }

        Self {
            ranges: merged.into_boxed_slice(),
        }
    }

    pub fn single(c: char) -> Self {
        Self {
            ranges: Box::new([(c, c)]),
        }
    }

    /// `c` plus its upper and lower case forms.
    ///
    /// Case mappings that expand to several characters (`'ß'` -> `"SS"`) are
    /// left out; one transition consumes exactly one character.
    pub fn caseless(c: char) -> Self {
        let mut ranges = vec![(c, c)];
        let mut lower = c.to_lowercase();
        if let (Some(l), None) = (lower.next(), lower.next()) {
            ranges.push((l, l));
        }
        let mut upper = c.to_uppercase();
        if let (Some(u), None) = (upper.next(), upper.next()) {
            ranges.push((u, u));
        }
        Self::new(ranges)
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < c {
                    std::cmp::Ordering::Less
                } else if lo > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub class: CharClass,
    pub target: StateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    transitions: Vec<Transition>,
    epsilons: Vec<StateId>,
    /// Index of the accepted pattern. Lower index means higher priority.
    accept: Option<usize>,
}

impl State {
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn epsilons(&self) -> &[StateId] {
        &self.epsilons
    }

    pub fn accept(&self) -> Option<usize> {
        self.accept
    }
}

#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    start: StateId,
}

impl Automaton {
    pub fn start(&self) -> StateId {
        self.start
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// A graph piece with one entry and one exit state.
///
/// The exit has no outgoing edges until a combinator connects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub entry: StateId,
    pub exit: StateId,
}

impl Fragment {
    pub fn new(entry: StateId, exit: StateId) -> Self {
        Self { entry, exit }
    }
}

#[derive(Debug, Default)]
pub struct AutomatonBuilder {
    states: Vec<State>,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::default());
        id
    }

    pub fn connect_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from as usize].epsilons.push(to);
    }

    pub fn connect_class(&mut self, from: StateId, class: CharClass, to: StateId) {
        self.states[from as usize]
            .transitions
            .push(Transition { class, target: to });
    }

    pub fn accept(&mut self, state: StateId, pattern: usize) {
        self.states[state as usize].accept = Some(pattern);
    }

    pub fn finish(self, start: StateId) -> Automaton {
        Automaton {
            states: self.states,
            start,
        }
    }

    /// Whether `to` is reachable from `from` without consuming input.
    pub fn epsilon_reachable(&self, from: StateId, to: StateId) -> bool {
        let mut seen = vec![false; self.states.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if std::mem::replace(&mut seen[id as usize], true) {
                continue;
            }
            stack.extend(&self.states[id as usize].epsilons);
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fragment Combinators
    // ─────────────────────────────────────────────────────────────────────

    pub fn epsilon_fragment(&mut self) -> Fragment {
        let id = self.add_state();
        Fragment::new(id, id)
    }

    /// entry --class--> exit
    pub fn class_fragment(&mut self, class: CharClass) -> Fragment {
        let entry = self.add_state();
        let exit = self.add_state();
        self.connect_class(entry, class, exit);
        Fragment::new(entry, exit)
    }

    /// f1 → f2 → ... → fn
    pub fn sequence(&mut self, fragments: &[Fragment]) -> Fragment {
        match fragments {
            [] => self.epsilon_fragment(),
            [single] => *single,
            [first, .., last] => {
                for window in fragments.windows(2) {
                    self.connect_epsilon(window[0].exit, window[1].entry);
                }
                Fragment::new(first.entry, last.exit)
            }
        }
    }

    /// Fresh entry branching into every fragment, all rejoining at a fresh exit.
    pub fn alternation(&mut self, fragments: &[Fragment]) -> Fragment {
        let entry = self.add_state();
        let exit = self.add_state();
        for f in fragments {
            self.connect_epsilon(entry, f.entry);
            self.connect_epsilon(f.exit, exit);
        }
        Fragment::new(entry, exit)
    }

    /// `f?`
    pub fn optional(&mut self, f: Fragment) -> Fragment {
        let entry = self.add_state();
        let exit = self.add_state();
        self.connect_epsilon(entry, f.entry);
        self.connect_epsilon(entry, exit);
        self.connect_epsilon(f.exit, exit);
        Fragment::new(entry, exit)
    }

    /// `f*`
    pub fn star(&mut self, f: Fragment) -> Fragment {
        let entry = self.add_state();
        let exit = self.add_state();
        self.connect_epsilon(entry, f.entry);
        self.connect_epsilon(entry, exit);
        self.connect_epsilon(f.exit, f.entry);
        self.connect_epsilon(f.exit, exit);
        Fragment::new(entry, exit)
    }

    /// `f+`
    pub fn plus(&mut self, f: Fragment) -> Fragment {
        let exit = self.add_state();
        self.connect_epsilon(f.exit, f.entry);
        self.connect_epsilon(f.exit, exit);
        Fragment::new(f.entry, exit)
    }
}
