//! DFA minimization by partition refinement.
//!
//! Works on the serialized form of the automaton: the char map, the dense
//! transition matrix and the token lists.
//!
//! 1. States start out grouped by their exact matched-token list; all states
//!    recognising nothing share one class.
//! 2. Every round, states of a class that reach different classes on some
//!    symbol are split apart. A dead entry counts as a class of its own. The
//!    partition only ever gets finer, so the loop stops after at most as many
//!    rounds as there are states.
//! 3. One state is rebuilt per class, keeping the class's token list.
//!
//! The resulting automaton recognises exactly the same (token, length) pairs
//! from every input as the original.

use super::serialize::{char_map, token_lists, transitions};
use super::{Dfa, MatchedTokens};
use crate::id::StateId;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Class of every state, numbered by first appearance, plus the class count.
type Partition = (Vec<u32>, usize);

const DEAD_CLASS: u32 = u32::MAX;

// Class counts never exceed the state count
#[allow(clippy::cast_possible_truncation)]
fn number_by_key<K: Eq + std::hash::Hash>(keys: impl Iterator<Item = K>) -> Partition {
    let mut numbering: HashMap<K, u32, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    let classes = keys
        .map(|key| {
            let next = numbering.len() as u32;
            *numbering.entry(key).or_insert(next)
        })
        .collect();
    (classes, numbering.len())
}

fn initial_partition(tokens: &[MatchedTokens]) -> Partition {
    number_by_key(tokens.iter().map(|matched| matched.as_slice()))
}

fn refine(classes: &[u32], matrix: &[StateId], width: usize) -> Partition {
    number_by_key((0..classes.len()).map(|s| {
        let mut signature: SmallVec<[u32; 16]> = SmallVec::with_capacity(width + 1);
        signature.push(classes[s]);
        signature.extend(matrix[s * width..(s + 1) * width].iter().map(|target| {
            if target.is_dead() {
                DEAD_CLASS
            } else {
                classes[target.index()]
            }
        }));
        signature
    }))
}

/// Merges equivalent states of `dfa`.
#[must_use]
pub fn minimize(dfa: &Dfa) -> Dfa {
    let columns = char_map(dfa);
    let width = columns.len();
    let matrix = transitions(dfa, &columns);
    let tokens = token_lists(dfa);

    let (mut classes, mut count) = initial_partition(&tokens);
    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let (refined, refined_count) = refine(&classes, &matrix, width);
        classes = refined;
        if refined_count == count {
            break;
        }
        count = refined_count;
    }

    let mut representative: Vec<Option<usize>> = vec![None; count];
    for (state, &class) in classes.iter().enumerate() {
        representative[class as usize].get_or_insert(state);
    }
    let states = representative
        .iter()
        .map(|rep| rep.map_or_else(MatchedTokens::new, |s| tokens[s].clone()))
        .collect::<Vec<_>>();

    let mut minimized = Dfa::with_states(Vec::new(), StateId(0));
    for matched in states {
        minimized.add_state(matched);
    }
    for (state, &class) in classes.iter().enumerate() {
        for (column, target) in matrix[state * width..(state + 1) * width].iter().enumerate() {
            if !target.is_dead() {
                // Members of a class agree on every target class, so repeats overwrite
                // an edge with itself.
                minimized.add_edge(
                    StateId(class),
                    columns[column],
                    StateId(classes[target.index()]),
                );
            }
        }
    }
    minimized.set_start(StateId(classes[dfa.start().index()]));

    log::debug!(
        "minimized DFA: {} -> {} states in {} rounds",
        dfa.len(),
        minimized.len(),
        rounds
    );
    minimized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::subset::construct;
    use crate::id::TokenId;
    use crate::nfa::thompson;
    use crate::regex::Regex;

    #[test]
    fn test_merges_equivalent_tails() {
        // ab | cb: the two 'b' states and the two end states collapse
        let mut dfa = Dfa::new();
        let a = dfa.add_state([]);
        let c = dfa.add_state([]);
        let ab = dfa.add_state([TokenId(0)]);
        let cb = dfa.add_state([TokenId(0)]);
        dfa.add_edge(dfa.start(), 'a', a);
        dfa.add_edge(dfa.start(), 'c', c);
        dfa.add_edge(a, 'b', ab);
        dfa.add_edge(c, 'b', cb);

        let minimized = minimize(&dfa);
        assert_eq!(minimized.len(), 3);
        assert_eq!(minimized.longest_match("ab"), Some((2, &[TokenId(0)][..])));
        assert_eq!(minimized.longest_match("cb"), Some((2, &[TokenId(0)][..])));
        assert_eq!(minimized.longest_match("bb"), None);
    }

    #[test]
    fn test_distinct_token_lists_stay_apart() {
        let mut dfa = Dfa::new();
        let x = dfa.add_state([TokenId(0)]);
        let y = dfa.add_state([TokenId(1)]);
        dfa.add_edge(dfa.start(), 'x', x);
        dfa.add_edge(dfa.start(), 'y', y);
        assert_eq!(minimize(&dfa).len(), 3);
    }

    #[test]
    fn test_thompson_output_shrinks() {
        let re = Regex::single('a')
            .or(&Regex::single('b'))
            .many()
            .concat(&Regex::string("abb"))
            .group(TokenId(0));
        let dfa = construct(&thompson::translate(&re));
        let minimized = minimize(&dfa);
        // The textbook (a|b)*abb automaton
        assert_eq!(minimized.len(), 4);
        for input in ["abb", "aabb", "babb", "ababb", "ab", "abba", "bbbbabb"] {
            assert_eq!(
                dfa.longest_match(input),
                minimized.longest_match(input),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let re = Regex::range('a', 'c').one_or_many().group(TokenId(0));
        let once = minimize(&construct(&thompson::translate(&re)));
        let twice = minimize(&once);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.len(), 2);
    }
}
