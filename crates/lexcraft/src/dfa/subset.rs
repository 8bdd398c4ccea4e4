//! Subset construction: NFA to DFA.

use super::Dfa;
use crate::id::{StateId, TokenId};
use crate::nfa::{Nfa, StateSet};
use hashbrown::HashMap;
use std::collections::VecDeque;

fn matched_tokens<'a>(nfa: &'a Nfa, set: &'a StateSet) -> impl Iterator<Item = TokenId> + 'a {
    set.iter().filter_map(|&s| nfa.state(StateId(s)).matched())
}

/// Determinizes `nfa`.
///
/// Each DFA state stands for the epsilon-closed set of NFA states reachable on
/// the same input; its matched list is the sorted union of the tokens those NFA
/// states carry. A graph whose entry edge is still labeled is normalized on a
/// copy first.
#[must_use]
pub fn construct(nfa: &Nfa) -> Dfa {
    let Some(start) = nfa.start() else {
        let mut normalized = nfa.clone();
        normalized.normalize();
        return construct(&normalized);
    };

    let alphabet = nfa.alphabet();
    let mut dfa = Dfa::with_states(Vec::new(), StateId(0));
    let mut known: HashMap<StateSet, StateId, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    let mut worklist = VecDeque::new();

    let initial = nfa.epsilon_closure([start]);
    let initial_id = dfa.add_state(matched_tokens(nfa, &initial));
    dfa.set_start(initial_id);
    known.insert(initial.clone(), initial_id);
    worklist.push_back((initial, initial_id));

    while let Some((set, id)) = worklist.pop_front() {
        for &c in &alphabet {
            let moved = nfa.step(&set, c);
            if moved.is_empty() {
                continue;
            }
            let target = nfa.epsilon_closure(moved);
            let target_id = if let Some(&existing) = known.get(&target) {
                existing
            } else {
                let new_id = dfa.add_state(matched_tokens(nfa, &target));
                known.insert(target.clone(), new_id);
                worklist.push_back((target, new_id));
                new_id
            };
            dfa.add_edge(id, c, target_id);
        }
    }

    log::trace!(
        "subset construction: {} NFA states -> {} DFA states over {} symbols",
        nfa.len(),
        dfa.len(),
        alphabet.len()
    );
    dfa
}
