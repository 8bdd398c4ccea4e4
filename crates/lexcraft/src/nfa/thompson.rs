//! Structural (Thompson) construction.
//!
//! Every expression node becomes one fragment with an entry edge and an end
//! state; fragments are stitched together by handing an entry edge to the end
//! state of whatever precedes it. The state count is linear in the size of the
//! expression.

use super::{Nfa, NfaEdge};
use crate::id::StateId;
use crate::regex::{Regex, RegexNode};

/// Entry edge and end state of a partially built fragment.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    entry: NfaEdge,
    end: StateId,
}

fn empty_fragment(nfa: &mut Nfa) -> Fragment {
    let state = nfa.add_state();
    Fragment {
        entry: NfaEdge::epsilon(state),
        end: state,
    }
}

fn build(nfa: &mut Nfa, node: &RegexNode) -> Fragment {
    match node {
        RegexNode::Empty => empty_fragment(nfa),
        RegexNode::CharSet(set) => {
            let start = nfa.add_state();
            let end = nfa.add_state();
            for &c in set {
                nfa.add_edge(start, NfaEdge::on(c, end));
            }
            Fragment {
                entry: NfaEdge::epsilon(start),
                end,
            }
        }
        RegexNode::Literal(text) => {
            let mut chars = text.chars();
            let Some(first) = chars.next() else {
                return empty_fragment(nfa);
            };
            let mut end = nfa.add_state();
            let entry = NfaEdge::on(first, end);
            for c in chars {
                let next = nfa.add_state();
                nfa.add_edge(end, NfaEdge::on(c, next));
                end = next;
            }
            Fragment { entry, end }
        }
        RegexNode::Star(inner) => {
            // The hub is both the way in and the way out: skipping the inner
            // fragment is the bypass, the inner end returning to it the loop.
            let hub = nfa.add_state();
            let inner = build(nfa, inner);
            nfa.add_edge(hub, inner.entry);
            nfa.add_edge(inner.end, NfaEdge::epsilon(hub));
            Fragment {
                entry: NfaEdge::epsilon(hub),
                end: hub,
            }
        }
        RegexNode::Concat(left, right) => {
            let left = build(nfa, left);
            let right = build(nfa, right);
            nfa.add_edge(left.end, right.entry);
            Fragment {
                entry: left.entry,
                end: right.end,
            }
        }
        RegexNode::Alt(left, right) => {
            let start = nfa.add_state();
            let left = build(nfa, left);
            let right = build(nfa, right);
            let end = nfa.add_state();
            nfa.add_edge(start, left.entry);
            nfa.add_edge(start, right.entry);
            nfa.add_edge(left.end, NfaEdge::epsilon(end));
            nfa.add_edge(right.end, NfaEdge::epsilon(end));
            Fragment {
                entry: NfaEdge::epsilon(start),
                end,
            }
        }
    }
}

/// Translates one expression. The end state carries the expression's group id,
/// and the result is normalized.
#[must_use]
pub fn translate(regex: &Regex) -> Nfa {
    let mut nfa = Nfa::empty();
    let fragment = build(&mut nfa, regex.node());
    nfa.set_entry(fragment.entry);
    nfa.set_end(Some(fragment.end));
    if let Some(group) = regex.group_id() {
        nfa.set_matched(fragment.end, group);
    }
    nfa.normalize();
    nfa
}

/// Translates every expression and joins them under one start state with an
/// epsilon edge into each. The combined graph has no end state; acceptance is
/// carried by the matched tokens of each translation's end.
#[must_use]
pub fn translate_all(regexes: &[Regex]) -> Nfa {
    let mut nfa = Nfa::new();
    nfa.set_end(None);
    let start = StateId(0);
    for regex in regexes {
        let annexed = nfa.annex(translate(regex));
        nfa.add_edge(start, annexed.entry);
    }
    nfa
}
