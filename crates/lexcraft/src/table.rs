//! # Compiled tables
//!
//! [`CompiledTable`] is the only artifact the tokenizer consumes. It is a dense
//! `[state][char index]` matrix with [`StateId::DEAD`] for missing transitions,
//! a map from characters to column indices, and the matched-token list of every
//! state. Tables are immutable, `Send + Sync`, and can be shared by any number
//! of tokenizing sessions.
//!
//! With the `serialize` feature the table implements serde's `Serialize` and
//! `Deserialize`, so a compiled grammar can be persisted and reloaded without
//! rebuilding the automata. Deserialization goes through
//! [`CompiledTable::try_from_parts`], so a table with inconsistent dimensions
//! is rejected instead of loaded.

use crate::dfa::{Dfa, DfaState, MatchedTokens};
use crate::error::TableError;
use crate::id::{StateId, TokenId};
use hashbrown::HashMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TableParts")
)]
pub struct CompiledTable {
    /// Column `i` of the matrix is the transition on `alphabet[i]`.
    alphabet: Vec<char>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    char_index: HashMap<char, u32, ahash::RandomState>,
    transitions: Vec<StateId>,
    matched: Vec<MatchedTokens>,
    start: StateId,
}

impl CompiledTable {
    /// Assembles a table; `transitions.len()` must equal `matched.len() * alphabet.len()`.
    pub(crate) fn from_parts(
        alphabet: Vec<char>,
        transitions: Vec<StateId>,
        matched: Vec<MatchedTokens>,
        start: StateId,
    ) -> Self {
        debug_assert_eq!(transitions.len(), matched.len() * alphabet.len());
        let mut char_index =
            HashMap::with_capacity_and_hasher(alphabet.len(), ahash::RandomState::new());
        for (i, &c) in alphabet.iter().enumerate() {
            char_index.insert(c, u32::try_from(i).unwrap_or(u32::MAX));
        }
        Self {
            alphabet,
            char_index,
            transitions,
            matched,
            start,
        }
    }

    /// Assembles a table from untrusted parts.
    ///
    /// # Errors
    ///
    /// [`TableError`] if the alphabet is not strictly ascending, the matrix
    /// size is not `states * alphabet`, or the start state or a transition
    /// target is out of range.
    pub fn try_from_parts(
        alphabet: Vec<char>,
        transitions: Vec<StateId>,
        matched: Vec<MatchedTokens>,
        start: StateId,
    ) -> Result<Self, TableError> {
        if let Some(pair) = alphabet.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(TableError::UnsortedAlphabet(pair[1]));
        }
        let expected = matched.len() * alphabet.len();
        if transitions.len() != expected {
            return Err(TableError::Dimensions {
                expected,
                found: transitions.len(),
            });
        }
        if start.index() >= matched.len() {
            return Err(TableError::StateOutOfRange(start.0));
        }
        if let Some(target) = transitions
            .iter()
            .find(|target| !target.is_dead() && target.index() >= matched.len())
        {
            return Err(TableError::StateOutOfRange(target.0));
        }
        Ok(Self::from_parts(alphabet, transitions, matched, start))
    }

    #[must_use]
    pub const fn start(&self) -> StateId {
        self.start
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.matched.len()
    }

    /// Characters with a column, ascending.
    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    #[must_use]
    pub fn char_index(&self, c: char) -> Option<usize> {
        self.char_index.get(&c).map(|&i| i as usize)
    }

    /// The matrix row of `state`; entries may be [`StateId::DEAD`].
    #[must_use]
    pub fn row(&self, state: StateId) -> &[StateId] {
        let width = self.alphabet.len();
        let from = state.index() * width;
        &self.transitions[from..from + width]
    }

    /// Transition on `c`, or `None` if `c` is not in the alphabet or the entry is dead.
    #[must_use]
    pub fn next_state(&self, state: StateId, c: char) -> Option<StateId> {
        let column = self.char_index(c)?;
        let target = self.row(state)[column];
        (!target.is_dead()).then_some(target)
    }

    /// Tokens recognised in `state`, highest priority first.
    #[must_use]
    pub fn matched(&self, state: StateId) -> &[TokenId] {
        &self.matched[state.index()]
    }

    #[must_use]
    pub fn is_accepting(&self, state: StateId) -> bool {
        !self.matched(state).is_empty()
    }

    /// Rebuilds an arena automaton from the table, for inspection and rendering.
    #[must_use]
    pub fn to_dfa(&self) -> Dfa {
        let states = (0..self.state_count())
            .map(|s| {
                let state = StateId::from_index(s);
                let edges: BTreeMap<char, StateId> = self
                    .alphabet
                    .iter()
                    .zip(self.row(state))
                    .filter(|(_, target)| !target.is_dead())
                    .map(|(&c, &target)| (c, target))
                    .collect();
                DfaState::from_parts(edges, self.matched[s].clone())
            })
            .collect();
        Dfa::with_states(states, self.start)
    }
}

/// Serialized fields of a [`CompiledTable`]; the char index is rebuilt on load.
#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct TableParts {
    alphabet: Vec<char>,
    transitions: Vec<StateId>,
    matched: Vec<MatchedTokens>,
    start: StateId,
}

#[cfg(feature = "serialize")]
impl TryFrom<TableParts> for CompiledTable {
    type Error = TableError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        Self::try_from_parts(parts.alphabet, parts.transitions, parts.matched, parts.start)
    }
}
