//! # Nondeterministic automata
//!
//! An [`Nfa`] is an arena of [`NfaState`]s. Edges live on their source state
//! and reference targets by [`StateId`]; an edge label of `None` is an epsilon
//! edge.
//!
//! A graph is entered through a single *entry edge* rather than a start state.
//! That lets a fragment hand its first labeled transition to whatever precedes
//! it during compositional construction. [`Nfa::normalize`] turns a labeled
//! entry edge into an epsilon edge into a fresh state, which is the shape the
//! subset construction expects.
//!
//! Two constructors produce NFAs from [`Regex`](crate::Regex) trees:
//!
//! - [`thompson`]: one fragment per expression node, epsilon-rich.
//! - [`glushkov`]: one state per symbol occurrence, no epsilon edges.

pub mod glushkov;
pub mod thompson;

use crate::id::{StateId, TokenId};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Sorted, deduplicated set of NFA states; the key type of subset construction.
pub type StateSet = SmallVec<[u32; 8]>;

/// An edge to `target`, consuming `label` or nothing when `label` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NfaEdge {
    pub label: Option<char>,
    pub target: StateId,
}

impl NfaEdge {
    #[must_use]
    pub const fn epsilon(target: StateId) -> Self {
        Self {
            label: None,
            target,
        }
    }

    #[must_use]
    pub const fn on(label: char, target: StateId) -> Self {
        Self {
            label: Some(label),
            target,
        }
    }

    #[must_use]
    pub const fn is_epsilon(&self) -> bool {
        self.label.is_none()
    }

    const fn shifted(self, offset: u32) -> Self {
        Self {
            label: self.label,
            target: StateId(self.target.0 + offset),
        }
    }
}

/// NFA state for construction
#[derive(Debug, Clone, Default)]
pub struct NfaState {
    edges: SmallVec<[NfaEdge; 2]>,
    matched: Option<TokenId>,
}

impl NfaState {
    #[must_use]
    pub fn edges(&self) -> &[NfaEdge] {
        &self.edges
    }

    /// The token recognised when the automaton stops in this state.
    #[must_use]
    pub const fn matched(&self) -> Option<TokenId> {
        self.matched
    }
}

/// Where an annexed sub-graph is entered and where it ends, renumbered.
#[derive(Debug, Clone, Copy)]
pub struct Annexed {
    pub entry: NfaEdge,
    pub end: Option<StateId>,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    entry: NfaEdge,
    end: Option<StateId>,
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfa {
    /// A single state entered by epsilon; matches the empty string.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: vec![NfaState::default()],
            entry: NfaEdge::epsilon(StateId(0)),
            end: Some(StateId(0)),
        }
    }

    /// A graph with no states yet; the caller must add one and set the entry edge.
    pub(crate) const fn empty() -> Self {
        Self {
            states: Vec::new(),
            entry: NfaEdge::epsilon(StateId(0)),
            end: None,
        }
    }

    pub fn add_state(&mut self) -> StateId {
        let id = StateId::from_index(self.states.len());
        self.states.push(NfaState::default());
        id
    }

    pub fn add_edge(&mut self, from: StateId, edge: NfaEdge) {
        self.states[from.index()].edges.push(edge);
    }

    pub fn set_matched(&mut self, state: StateId, token: TokenId) {
        self.states[state.index()].matched = Some(token);
    }

    #[must_use]
    pub fn state(&self, id: StateId) -> &NfaState {
        &self.states[id.index()]
    }

    #[must_use]
    pub fn states(&self) -> &[NfaState] {
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
    pub const fn entry(&self) -> NfaEdge {
        self.entry
    }

    pub fn set_entry(&mut self, entry: NfaEdge) {
        self.entry = entry;
    }

    #[must_use]
    pub const fn end(&self) -> Option<StateId> {
        self.end
    }

    pub fn set_end(&mut self, end: Option<StateId>) {
        self.end = end;
    }

    /// Moves every state of `other` into this arena.
    ///
    /// The returned entry edge and end state are renumbered into this graph; the
    /// caller decides where to attach them.
    pub fn annex(&mut self, other: Self) -> Annexed {
        let offset = u32::try_from(self.states.len()).unwrap_or(u32::MAX);
        self.states.extend(other.states.into_iter().map(|mut state| {
            for edge in &mut state.edges {
                *edge = edge.shifted(offset);
            }
            state
        }));
        Annexed {
            entry: other.entry.shifted(offset),
            end: other.end.map(|end| StateId(end.0 + offset)),
        }
    }

    /// Ensures the entry edge is an epsilon edge. Returns `true` if a state was added.
    pub fn normalize(&mut self) -> bool {
        if self.entry.is_epsilon() {
            return false;
        }
        let start = self.add_state();
        self.add_edge(start, self.entry);
        self.entry = NfaEdge::epsilon(start);
        true
    }

    /// The state the automaton starts in, if the graph is normalized.
    #[must_use]
    pub const fn start(&self) -> Option<StateId> {
        if self.entry.is_epsilon() {
            Some(self.entry.target)
        } else {
            None
        }
    }

    /// Every state reachable from `seeds` through zero or more epsilon edges.
    #[must_use]
    pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateId>) -> StateSet {
        let mut visited = vec![false; self.states.len()];
        let mut stack: SmallVec<[StateId; 16]> = SmallVec::new();
        for seed in seeds {
            if !visited[seed.index()] {
                visited[seed.index()] = true;
                stack.push(seed);
            }
        }
        let mut closure = StateSet::new();
        while let Some(state) = stack.pop() {
            closure.push(state.0);
            for edge in self.states[state.index()].edges.iter().filter(|e| e.is_epsilon()) {
                if !visited[edge.target.index()] {
                    visited[edge.target.index()] = true;
                    stack.push(edge.target);
                }
            }
        }
        closure.sort_unstable();
        closure
    }

    /// States reachable from `set` by consuming `c`, before closure.
    #[must_use]
    pub fn step(&self, set: &[u32], c: char) -> SmallVec<[StateId; 8]> {
        let mut targets: SmallVec<[StateId; 8]> = set
            .iter()
            .flat_map(|&s| self.states[s as usize].edges.iter())
            .filter(|edge| edge.label == Some(c))
            .map(|edge| edge.target)
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Every character labelling some edge, in ascending order.
    #[must_use]
    pub fn alphabet(&self) -> BTreeSet<char> {
        let mut alphabet: BTreeSet<char> = self
            .states
            .iter()
            .flat_map(|state| state.edges.iter().filter_map(|edge| edge.label))
            .collect();
        if let Some(c) = self.entry.label {
            alphabet.insert(c);
        }
        alphabet
    }

    /// Number of epsilon edges, entry edge excluded.
    #[must_use]
    pub fn epsilon_edge_count(&self) -> usize {
        self.states
            .iter()
            .flat_map(|state| state.edges.iter())
            .filter(|edge| edge.is_epsilon())
            .count()
    }
}
