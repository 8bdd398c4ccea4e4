//! # Deterministic automata
//!
//! A [`Dfa`] is the build-time arena between the NFA constructions and the
//! dense [`CompiledTable`](crate::table::CompiledTable) consumed at run time:
//!
//! 1. [`subset::construct`] determinizes an [`Nfa`](crate::nfa::Nfa),
//! 2. [`minimize::minimize`] merges equivalent states,
//! 3. [`serialize::serialize`] flattens the result into a table.
//!
//! Each state keeps the ids of the tokens it recognises, sorted ascending, so the
//! first entry is always the highest-priority token.

pub mod minimize;
pub mod serialize;
pub mod subset;

use crate::id::{StateId, TokenId};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Token ids recognised by a state, ascending and without duplicates.
pub type MatchedTokens = SmallVec<[TokenId; 2]>;

/// DFA state with transitions and accepting information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaState {
    edges: BTreeMap<char, StateId>,
    matched: MatchedTokens,
}

impl DfaState {
    pub(crate) const fn from_parts(edges: BTreeMap<char, StateId>, matched: MatchedTokens) -> Self {
        Self { edges, matched }
    }

    #[must_use]
    pub fn edges(&self) -> &BTreeMap<char, StateId> {
        &self.edges
    }

    #[must_use]
    pub fn next(&self, c: char) -> Option<StateId> {
        self.edges.get(&c).copied()
    }

    #[must_use]
    pub fn matched(&self) -> &[TokenId] {
        &self.matched
    }

    /// Highest-priority token recognised here.
    #[must_use]
    pub fn best(&self) -> Option<TokenId> {
        self.matched.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: StateId,
}

impl Default for Dfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Dfa {
    /// An automaton with a single non-accepting start state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: vec![DfaState::default()],
            start: StateId(0),
        }
    }

    pub(crate) const fn with_states(states: Vec<DfaState>, start: StateId) -> Self {
        Self { states, start }
    }

    /// Adds a state recognising `matched`, which is sorted and deduplicated here.
    pub fn add_state(&mut self, matched: impl IntoIterator<Item = TokenId>) -> StateId {
        let mut matched: MatchedTokens = matched.into_iter().collect();
        matched.sort_unstable();
        matched.dedup();
        let id = StateId::from_index(self.states.len());
        self.states.push(DfaState {
            edges: BTreeMap::new(),
            matched,
        });
        id
    }

    /// Sets the transition on `c`; a later call for the same pair wins.
    pub fn add_edge(&mut self, from: StateId, c: char, to: StateId) {
        self.states[from.index()].edges.insert(c, to);
    }

    #[must_use]
    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id.index()]
    }

    #[must_use]
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    pub fn set_start(&mut self, start: StateId) {
        self.start = start;
    }

    /// Every character with at least one transition, ascending.
    #[must_use]
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|state| state.edges.keys().copied())
            .collect()
    }

    /// Longest non-empty prefix of `input` that ends in an accepting state, as
    /// `(char count, tokens)`.
    #[must_use]
    pub fn longest_match(&self, input: &str) -> Option<(usize, &[TokenId])> {
        let mut state = self.start;
        let mut best = None;
        for (consumed, c) in input.chars().enumerate() {
            match self.state(state).next(c) {
                Some(next) => state = next,
                None => break,
            }
            let matched = self.state(state).matched();
            if !matched.is_empty() {
                best = Some((consumed + 1, matched));
            }
        }
        best
    }
}
