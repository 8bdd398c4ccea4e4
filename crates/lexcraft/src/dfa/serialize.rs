//! Flattening a [`Dfa`] into a [`CompiledTable`].
//!
//! The three parts of a table can also be produced on their own, which the
//! minimizer and the tests use to inspect an automaton without building the
//! whole table.

use super::{Dfa, MatchedTokens};
use crate::id::StateId;
use crate::table::CompiledTable;

/// The column order of the transition matrix: every character with a
/// transition, ascending.
#[must_use]
pub fn char_map(dfa: &Dfa) -> Vec<char> {
    dfa.alphabet().into_iter().collect()
}

/// Dense `[state][column]` matrix for the given column order, row-major, with
/// [`StateId::DEAD`] where a state has no transition.
#[must_use]
pub fn transitions(dfa: &Dfa, columns: &[char]) -> Vec<StateId> {
    let mut matrix = Vec::with_capacity(dfa.len() * columns.len());
    for state in dfa.states() {
        matrix.extend(
            columns
                .iter()
                .map(|&c| state.next(c).unwrap_or(StateId::DEAD)),
        );
    }
    matrix
}

/// Matched-token list of every state, by state id.
#[must_use]
pub fn token_lists(dfa: &Dfa) -> Vec<MatchedTokens> {
    dfa.states()
        .iter()
        .map(|state| state.matched().iter().copied().collect())
        .collect()
}

#[must_use]
pub fn serialize(dfa: &Dfa) -> CompiledTable {
    let columns = char_map(dfa);
    let matrix = transitions(dfa, &columns);
    CompiledTable::from_parts(columns, matrix, token_lists(dfa), dfa.start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TokenId;

    #[test]
    fn test_partial_parts_agree_with_table() {
        let mut dfa = Dfa::new();
        let x = dfa.add_state([TokenId(2)]);
        let y = dfa.add_state([]);
        dfa.add_edge(dfa.start(), 'y', y);
        dfa.add_edge(dfa.start(), 'x', x);
        dfa.add_edge(y, 'x', x);

        let columns = char_map(&dfa);
        assert_eq!(columns, vec!['x', 'y']);
        let matrix = transitions(&dfa, &columns);
        assert_eq!(matrix, vec![x, y, StateId::DEAD, StateId::DEAD, x, StateId::DEAD]);
        let tokens = token_lists(&dfa);
        assert_eq!(tokens[x.index()].as_slice(), &[TokenId(2)]);
        assert!(tokens[y.index()].is_empty());

        let table = serialize(&dfa);
        assert_eq!(table.alphabet(), columns.as_slice());
        for s in 0..dfa.len() {
            let state = StateId::from_index(s);
            assert_eq!(table.row(state), &matrix[s * 2..s * 2 + 2]);
            assert_eq!(table.matched(state), tokens[s].as_slice());
        }
    }

    #[test]
    fn test_empty_alphabet() {
        let table = serialize(&Dfa::new());
        assert_eq!(table.state_count(), 1);
        assert!(table.alphabet().is_empty());
        assert!(table.next_state(table.start(), 'a').is_none());
    }
}
