//! Static analysis run once when a grammar is built.
//!
//! Rejects grammars the parser cannot handle:
//! - Left recursion: a production reachable from itself without consuming input
//! - Non-productive productions: every alternative recurses without end
//! - Unbounded repetitions whose body can match nothing
//! - Decisions that stay ambiguous with the permitted look-ahead
//!
//! Every decision (a choice between alternatives, or whether an optional or
//! repeated element matches once more) is resolved with the smallest `k` for
//! which its strong LL(k) look-ahead sets are pairwise disjoint. Each step
//! from `k - 1` to `k` only extends the sequences still shared between
//! branches, so the cost follows the conflicts rather than `|tokens|^k`.

use std::collections::{BTreeSet, HashSet};

use grammatica_core::{GrammarError, ProductionId, TokenId};
use grammatica_lexer::Lexicon;
use indexmap::{IndexMap, IndexSet};

use super::lookahead::{LookAheadSet, Terminal, is_complete};
use super::production::{Decision, Production, Symbol};

/// Conflicting sequences listed in an ambiguity error.
const MAX_REPORTED_CONFLICTS: usize = 3;

pub(crate) fn analyze(
    productions: &mut IndexMap<ProductionId, Production>,
    start: ProductionId,
    max_lookahead: usize,
    lexicon: &Lexicon,
) -> Result<(), GrammarError> {
    let rules = Rules::new(productions)?;
    let Some(start) = productions.get_index_of(&start) else {
        return Err(GrammarError::Internal(format!(
            "start production {} missing after lowering",
            start
        )));
    };

    let nullable = rules.nullable();
    rules.check_left_recursion(&nullable)?;
    rules.check_productive()?;
    rules.check_loops(&nullable)?;

    let decisions = rules.resolve(start, max_lookahead, lexicon)?;
    for (site, decision) in decisions {
        match site {
            Site::Choice(rule) => {
                if let Some((_, production)) = productions.get_index_mut(rule) {
                    production.set_decision(decision);
                }
            }
            Site::Repeat { rule, alt, item } => {
                if let Some((_, production)) = productions.get_index_mut(rule) {
                    production.alternatives_mut()[alt].elements_mut()[item].set_decision(decision);
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
enum Sym {
    Token(TokenId),
    Rule(usize),
}

#[derive(Clone, Copy, Debug)]
struct Item {
    sym: Sym,
    min: u32,
    max: Option<u32>,
}

#[derive(Clone, Copy, Debug)]
enum Site {
    Choice(usize),
    Repeat { rule: usize, alt: usize, item: usize },
}

/// Productions re-indexed by position, so the analysis never fails on lookups.
struct Rules {
    alternatives: Vec<Vec<Vec<Item>>>,
    names: Vec<String>,
    /// Name reported in errors: the declared production a synthetic one came from.
    origin_names: Vec<String>,
}

impl Rules {
    fn new(productions: &IndexMap<ProductionId, Production>) -> Result<Self, GrammarError> {
        let mut alternatives = Vec::with_capacity(productions.len());
        for production in productions.values() {
            let mut lowered = Vec::with_capacity(production.alternatives().len());
            for alternative in production.alternatives() {
                let mut items = Vec::with_capacity(alternative.elements().len());
                for element in alternative.elements() {
                    let sym = match element.symbol() {
                        Symbol::Token(id) => Sym::Token(id),
                        Symbol::Production(id) => match productions.get_index_of(&id) {
                            Some(index) => Sym::Rule(index),
                            None => {
                                return Err(GrammarError::invalid_production(
                                    production.name(),
                                    format!("undefined production {}", id),
                                ));
                            }
                        },
                    };
                    items.push(Item {
                        sym,
                        min: element.min(),
                        max: element.max(),
                    });
                }
                lowered.push(items);
            }
            alternatives.push(lowered);
        }

        let names = productions.values().map(|p| p.name().to_string()).collect();
        let origin_names = productions
            .values()
            .map(|p| {
                productions
                    .get(&p.origin())
                    .map_or_else(|| p.name().to_string(), |o| o.name().to_string())
            })
            .collect();

        Ok(Self {
            alternatives,
            names,
            origin_names,
        })
    }

    fn len(&self) -> usize {
        self.alternatives.len()
    }

    fn nullable(&self) -> Vec<bool> {
        let mut nullable = vec![false; self.len()];
        let mut changed = true;
        while changed {
            changed = false;
            for rule in 0..self.len() {
                if nullable[rule] {
                    continue;
                }
                let any = self.alternatives[rule].iter().any(|items| {
                    items.iter().all(|item| {
                        item.min == 0 || matches!(item.sym, Sym::Rule(q) if nullable[q])
                    })
                });
                if any {
                    nullable[rule] = true;
                    changed = true;
                }
            }
        }
        nullable
    }

    fn check_left_recursion(&self, nullable: &[bool]) -> Result<(), GrammarError> {
        let mut adj: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for (rule, alternatives) in self.alternatives.iter().enumerate() {
            let edges = adj.entry(rule).or_default();
            for items in alternatives {
                for item in items {
                    let skippable = match item.sym {
                        Sym::Token(_) => item.min == 0,
                        Sym::Rule(q) => {
                            if !edges.contains(&q) {
                                edges.push(q);
                            }
                            item.min == 0 || nullable[q]
                        }
                    };
                    if !skippable {
                        break;
                    }
                }
            }
        }

        let nodes: Vec<usize> = (0..self.len()).collect();
        let Some(cycle) = CycleFinder::find(&nodes, &adj) else {
            return Ok(());
        };
        let first = cycle.first().copied().unwrap_or_default();
        Err(GrammarError::InfiniteLoop {
            name: self.origin_names[first].clone(),
            cycle: cycle.iter().map(|&r| self.names[r].clone()).collect(),
        })
    }

    fn check_productive(&self) -> Result<(), GrammarError> {
        let mut productive = vec![false; self.len()];
        let mut changed = true;
        while changed {
            changed = false;
            for rule in 0..self.len() {
                if productive[rule] {
                    continue;
                }
                let any = self.alternatives[rule].iter().any(|items| {
                    items.iter().all(|item| match item.sym {
                        Sym::Token(_) => true,
                        Sym::Rule(q) => item.min == 0 || productive[q],
                    })
                });
                if any {
                    productive[rule] = true;
                    changed = true;
                }
            }
        }

        match productive.iter().position(|p| !p) {
            Some(rule) => Err(GrammarError::invalid_production(
                self.origin_names[rule].as_str(),
                "every alternative recurses without end",
            )),
            None => Ok(()),
        }
    }

    fn check_loops(&self, nullable: &[bool]) -> Result<(), GrammarError> {
        for (rule, alternatives) in self.alternatives.iter().enumerate() {
            for item in alternatives.iter().flatten() {
                let Sym::Rule(q) = item.sym else {
                    continue;
                };
                if item.max.is_none() && nullable[q] {
                    return Err(GrammarError::InfiniteLoop {
                        name: self.origin_names[rule].clone(),
                        cycle: Vec::new(),
                    });
                }
            }
        }
        Ok(())
    }

    fn sites(&self) -> Vec<Site> {
        let mut sites = Vec::new();
        for (rule, alternatives) in self.alternatives.iter().enumerate() {
            if alternatives.len() > 1 {
                sites.push(Site::Choice(rule));
            }
            for (alt, items) in alternatives.iter().enumerate() {
                for (index, item) in items.iter().enumerate() {
                    if item.max != Some(item.min) {
                        sites.push(Site::Repeat {
                            rule,
                            alt,
                            item: index,
                        });
                    }
                }
            }
        }
        sites
    }

    /// Productions whose end may be followed by end of input: the start
    /// production and every production it cannot reach.
    fn roots(&self, start: usize) -> Vec<bool> {
        let mut reachable = vec![false; self.len()];
        let mut stack = vec![start];
        while let Some(rule) = stack.pop() {
            if std::mem::replace(&mut reachable[rule], true) {
                continue;
            }
            for item in self.alternatives[rule].iter().flatten() {
                if let Sym::Rule(q) = item.sym {
                    stack.push(q);
                }
            }
        }
        reachable
            .iter()
            .enumerate()
            .map(|(rule, &reached)| rule == start || !reached)
            .collect()
    }

    /// Every `(rule, alt, item)` referring to each production.
    fn callers(&self) -> Vec<Vec<(usize, usize, usize)>> {
        let mut callers = vec![Vec::new(); self.len()];
        for (rule, alternatives) in self.alternatives.iter().enumerate() {
            for (alt, items) in alternatives.iter().enumerate() {
                for (index, item) in items.iter().enumerate() {
                    if let Sym::Rule(q) = item.sym {
                        callers[q].push((rule, alt, index));
                    }
                }
            }
        }
        callers
    }

    fn resolve(
        &self,
        start: usize,
        max_lookahead: usize,
        lexicon: &Lexicon,
    ) -> Result<Vec<(Site, Decision)>, GrammarError> {
        let search = Search {
            rules: self,
            roots: self.roots(start),
            callers: self.callers(),
        };

        let mut resolved = Vec::new();
        for site in self.sites() {
            let mut levels = Vec::new();
            let mut shared: Option<BTreeSet<Vec<Terminal>>> = None;
            for k in 1..=max_lookahead {
                let sets = search.site_sets(site, k, shared.as_ref());
                let conflicts = conflicts(&sets);
                levels.push(sets);
                if conflicts.is_empty() {
                    resolved.push((site, Decision::new(levels)));
                    break;
                }
                // Sequences ending at end of input cannot be told apart by looking further.
                let stuck = conflicts.iter().all(|seq| seq.last() == Some(&Terminal::Eof));
                if stuck || k == max_lookahead {
                    return Err(self.ambiguity(site, &conflicts, lexicon));
                }
                shared = Some(conflicts);
            }
        }
        Ok(resolved)
    }

    fn ambiguity(
        &self,
        site: Site,
        conflicts: &BTreeSet<Vec<Terminal>>,
        lexicon: &Lexicon,
    ) -> GrammarError {
        let rule = match site {
            Site::Choice(rule) | Site::Repeat { rule, .. } => rule,
        };
        let conflicts = conflicts
            .iter()
            .take(MAX_REPORTED_CONFLICTS)
            .map(|seq| {
                seq.iter()
                    .map(|t| describe_terminal(lexicon, *t))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        GrammarError::InherentAmbiguity {
            name: self.origin_names[rule].clone(),
            conflicts,
        }
    }
}

pub(crate) fn describe_terminal(lexicon: &Lexicon, terminal: Terminal) -> String {
    match terminal {
        Terminal::Token(id) => lexicon.describe(id),
        Terminal::Eof => "<EOF>".to_string(),
    }
}

fn conflicts(sets: &[LookAheadSet]) -> BTreeSet<Vec<Terminal>> {
    let mut out = BTreeSet::new();
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            out.extend(a.intersection(b).iter().map(<[Terminal]>::to_vec));
        }
    }
    out
}

/// A pending piece of input still to be derived.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum Frame {
    /// Item `index` of an alternative, `count` copies of it already matched.
    Seq {
        rule: usize,
        alt: usize,
        index: usize,
        count: u32,
    },
    /// Whatever may follow a complete `rule` anywhere in the grammar.
    Follow(usize),
}

/// Look-ahead sequences of a single decision, found by expanding the
/// grammar from the decision point.
///
/// Inside the decision's production the expansion is exact; past its end it
/// continues at every place the production is used, as strong LL(k) requires.
struct Search<'r> {
    rules: &'r Rules,
    roots: Vec<bool>,
    callers: Vec<Vec<(usize, usize, usize)>>,
}

impl Search<'_> {
    /// One set per branch, with sequences of length `k` or ending at end of
    /// input. With `shared`, only extensions of those sequences are kept.
    fn site_sets(
        &self,
        site: Site,
        k: usize,
        shared: Option<&BTreeSet<Vec<Terminal>>>,
    ) -> Vec<LookAheadSet> {
        match site {
            Site::Choice(rule) => (0..self.rules.alternatives[rule].len())
                .map(|alt| {
                    let stack = vec![
                        Frame::Follow(rule),
                        Frame::Seq {
                            rule,
                            alt,
                            index: 0,
                            count: 0,
                        },
                    ];
                    self.expand(stack, k, shared)
                })
                .collect(),
            Site::Repeat { rule, alt, item } => {
                let element = self.rules.alternatives[rule][alt][item];
                // One more copy on top of the mandatory ones, then anything allowed after.
                let again = vec![
                    Frame::Follow(rule),
                    Frame::Seq {
                        rule,
                        alt,
                        index: item,
                        count: element.min,
                    },
                ];
                let exit = vec![
                    Frame::Follow(rule),
                    Frame::Seq {
                        rule,
                        alt,
                        index: item + 1,
                        count: 0,
                    },
                ];
                vec![
                    self.expand_once(again, element, k, shared),
                    self.expand(exit, k, shared),
                ]
            }
        }
    }

    /// Like `expand`, but the top frame must take one more copy of `element` first.
    fn expand_once(
        &self,
        mut stack: Vec<Frame>,
        element: Item,
        k: usize,
        shared: Option<&BTreeSet<Vec<Terminal>>>,
    ) -> LookAheadSet {
        let mut walk = Walk::new(k, shared);
        if let Some(Frame::Seq { count, .. }) = stack.last_mut() {
            *count = next_count(element, *count);
        }
        self.push_symbol(&mut walk, stack, Vec::new(), element.sym);
        self.run(walk)
    }

    fn expand(
        &self,
        stack: Vec<Frame>,
        k: usize,
        shared: Option<&BTreeSet<Vec<Terminal>>>,
    ) -> LookAheadSet {
        let mut walk = Walk::new(k, shared);
        walk.work.push((stack, Vec::new()));
        self.run(walk)
    }

    fn run(&self, mut walk: Walk<'_>) -> LookAheadSet {
        while let Some((mut stack, prefix)) = walk.work.pop() {
            if !walk.seen.insert((stack.clone(), prefix.clone())) {
                continue;
            }
            let Some(frame) = stack.pop() else {
                continue;
            };
            match frame {
                Frame::Follow(rule) => {
                    if self.roots[rule] {
                        walk.emit(Vec::new(), &prefix, Terminal::Eof);
                    }
                    for &(parent, alt, index) in &self.callers[rule] {
                        let item = self.rules.alternatives[parent][alt][index];
                        let next = vec![
                            Frame::Follow(parent),
                            Frame::Seq {
                                rule: parent,
                                alt,
                                index,
                                count: next_count(item, 0),
                            },
                        ];
                        walk.work.push((next, prefix.clone()));
                    }
                }
                Frame::Seq {
                    rule,
                    alt,
                    index,
                    count,
                } => {
                    let Some(&item) = self.rules.alternatives[rule][alt].get(index) else {
                        walk.work.push((stack, prefix));
                        continue;
                    };
                    if count >= item.min {
                        let mut next = stack.clone();
                        next.push(Frame::Seq {
                            rule,
                            alt,
                            index: index + 1,
                            count: 0,
                        });
                        walk.work.push((next, prefix.clone()));
                    }
                    if item.max.is_none_or(|max| count < max) {
                        stack.push(Frame::Seq {
                            rule,
                            alt,
                            index,
                            count: next_count(item, count),
                        });
                        self.push_symbol(&mut walk, stack, prefix, item.sym);
                    }
                }
            }
        }
        walk.out
    }

    /// Continue with `sym`, then with `stack`.
    fn push_symbol(&self, walk: &mut Walk<'_>, stack: Vec<Frame>, prefix: Vec<Terminal>, sym: Sym) {
        match sym {
            Sym::Token(id) => walk.emit(stack, &prefix, Terminal::Token(id)),
            Sym::Rule(q) => {
                for alt in 0..self.rules.alternatives[q].len() {
                    let mut next = stack.clone();
                    next.push(Frame::Seq {
                        rule: q,
                        alt,
                        index: 0,
                        count: 0,
                    });
                    walk.work.push((next, prefix.clone()));
                }
            }
        }
    }
}

/// Copies matched after one more. Counts past `min` of an unbounded item
/// all behave alike, so they collapse into `min`.
fn next_count(item: Item, count: u32) -> u32 {
    let next = count.saturating_add(1);
    match item.max {
        Some(_) => next,
        None => next.min(item.min),
    }
}

type State = (Vec<Frame>, Vec<Terminal>);

struct Walk<'s> {
    k: usize,
    shared: Option<&'s BTreeSet<Vec<Terminal>>>,
    work: Vec<State>,
    seen: HashSet<State>,
    out: LookAheadSet,
}

impl<'s> Walk<'s> {
    fn new(k: usize, shared: Option<&'s BTreeSet<Vec<Terminal>>>) -> Self {
        Self {
            k,
            shared,
            work: Vec::new(),
            seen: HashSet::new(),
            out: LookAheadSet::new(),
        }
    }

    fn emit(&mut self, stack: Vec<Frame>, prefix: &[Terminal], terminal: Terminal) {
        let mut seq = Vec::with_capacity(prefix.len() + 1);
        seq.extend_from_slice(prefix);
        seq.push(terminal);
        if !self.admits(&seq) {
            return;
        }
        if is_complete(&seq, self.k) {
            self.out.insert(seq);
        } else {
            self.work.push((stack, seq));
        }
    }

    /// Whether `seq` extends one of the shared sequences one level up.
    fn admits(&self, seq: &[Terminal]) -> bool {
        let Some(shared) = self.shared else {
            return true;
        };
        let head = &seq[..seq.len().min(self.k - 1)];
        shared
            .range(head.to_vec()..)
            .next()
            .is_some_and(|candidate| candidate.starts_with(head))
    }
}

/// Depth-first search for a cycle in a graph of production indices.
struct CycleFinder<'a> {
    adj: &'a IndexMap<usize, Vec<usize>>,
    visited: IndexSet<usize>,
    on_path: IndexMap<usize, usize>,
    path: Vec<usize>,
}

impl<'a> CycleFinder<'a> {
    /// The first cycle found, as `[a, b, ..., a]`.
    fn find(nodes: &[usize], adj: &'a IndexMap<usize, Vec<usize>>) -> Option<Vec<usize>> {
        let mut finder = Self {
            adj,
            visited: IndexSet::new(),
            on_path: IndexMap::new(),
            path: Vec::new(),
        };

        for &start in nodes {
            if let Some(cycle) = finder.dfs(start) {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs(&mut self, current: usize) -> Option<Vec<usize>> {
        if self.on_path.contains_key(&current) || self.visited.contains(&current) {
            return None;
        }

        self.visited.insert(current);
        self.on_path.insert(current, self.path.len());
        self.path.push(current);

        if let Some(neighbors) = self.adj.get(&current) {
            for &target in neighbors {
                if let Some(&start_index) = self.on_path.get(&target) {
                    let mut cycle = self.path[start_index..].to_vec();
                    cycle.push(target);
                    return Some(cycle);
                }
                if let Some(cycle) = self.dfs(target) {
                    return Some(cycle);
                }
            }
        }

        self.path.pop();
        self.on_path.swap_remove(&current);
        None
    }
}
