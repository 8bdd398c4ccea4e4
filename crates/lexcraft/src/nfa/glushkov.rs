//! Position (Glushkov) construction.
//!
//! States correspond to *letters*, the symbol occurrences of an expression: a
//! char-set node is one letter covering all of its characters, and every
//! character position of a literal is a letter of its own. For each node the
//! construction derives
//!
//! - `nullable`: whether the node accepts the empty string,
//! - `first`: letters that can start a match,
//! - `last`: letters that can end a match,
//!
//! and, over the whole expression, the follow pairs `(a, b)` meaning letter `b`
//! may directly follow letter `a`. The automaton has one start state plus one
//! state per letter, edges from the start to every first letter of the root, and
//! edges along every follow pair. No epsilon edges are produced.
//!
//! Attributes are cached per occurrence, not per expression value. The tree is
//! first lowered into an arena where every visited node gets a fresh index, so a
//! sub-expression shared through an `Arc` (or two structurally equal ones)
//! yields distinct letters wherever it occurs.

use super::{Nfa, NfaEdge};
use crate::id::StateId;
use crate::regex::{Regex, RegexNode};
use hashbrown::HashSet;
use smallvec::SmallVec;

type Letters = SmallVec<[u32; 4]>;

#[derive(Debug, Clone, Copy)]
enum Occurrence {
    Empty,
    Letter(u32),
    /// `len` consecutive letters starting at `first`.
    Literal {
        first: u32,
        len: u32,
    },
    Concat(usize, usize),
    Alt(usize, usize),
    Star(usize),
}

/// Expression lowered into occurrence order. Children always precede parents.
#[derive(Debug, Default)]
struct PositionTree {
    nodes: Vec<Occurrence>,
    letters: Vec<SmallVec<[char; 4]>>,
}

// Letter counts are bounded by the total size of the token patterns
#[allow(clippy::cast_possible_truncation)]
impl PositionTree {
    fn push(&mut self, occurrence: Occurrence) -> usize {
        self.nodes.push(occurrence);
        self.nodes.len() - 1
    }

    fn new_letter(&mut self, chars: impl IntoIterator<Item = char>) -> u32 {
        self.letters.push(chars.into_iter().collect());
        (self.letters.len() - 1) as u32
    }

    fn lower(&mut self, node: &RegexNode) -> usize {
        match node {
            RegexNode::Empty => self.push(Occurrence::Empty),
            RegexNode::CharSet(set) => {
                let letter = self.new_letter(set.iter().copied());
                self.push(Occurrence::Letter(letter))
            }
            RegexNode::Literal(text) if text.is_empty() => self.push(Occurrence::Empty),
            RegexNode::Literal(text) => {
                let first = self.letters.len() as u32;
                for c in text.chars() {
                    self.new_letter([c]);
                }
                let len = self.letters.len() as u32 - first;
                self.push(Occurrence::Literal { first, len })
            }
            RegexNode::Concat(left, right) => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.push(Occurrence::Concat(left, right))
            }
            RegexNode::Alt(left, right) => {
                let left = self.lower(left);
                let right = self.lower(right);
                self.push(Occurrence::Alt(left, right))
            }
            RegexNode::Star(inner) => {
                let inner = self.lower(inner);
                self.push(Occurrence::Star(inner))
            }
        }
    }
}

/// Per-occurrence attributes plus the follow relation of the whole tree.
#[derive(Debug)]
struct Analysis {
    nullable: Vec<bool>,
    first: Vec<Letters>,
    last: Vec<Letters>,
    follow: Vec<Letters>,
}

impl Analysis {
    fn link(&mut self, seen: &mut HashSet<(u32, u32), ahash::RandomState>, from: u32, to: u32) {
        if seen.insert((from, to)) {
            self.follow[from as usize].push(to);
        }
    }

    fn link_all(
        &mut self,
        seen: &mut HashSet<(u32, u32), ahash::RandomState>,
        from: &Letters,
        to: &Letters,
    ) {
        for &a in from {
            for &b in to {
                self.link(seen, a, b);
            }
        }
    }

    /// One forward sweep; since children precede parents every occurrence is
    /// computed exactly once, from already cached children.
    fn run(tree: &PositionTree) -> Self {
        let n = tree.nodes.len();
        let mut analysis = Self {
            nullable: Vec::with_capacity(n),
            first: Vec::with_capacity(n),
            last: Vec::with_capacity(n),
            follow: vec![Letters::new(); tree.letters.len()],
        };
        let mut seen = HashSet::with_hasher(ahash::RandomState::new());

        for occurrence in &tree.nodes {
            let (nullable, first, last) = match *occurrence {
                Occurrence::Empty => (true, Letters::new(), Letters::new()),
                Occurrence::Letter(letter) => {
                    (false, Letters::from_elem(letter, 1), Letters::from_elem(letter, 1))
                }
                Occurrence::Literal { first, len } => {
                    for letter in first..first + len - 1 {
                        analysis.link(&mut seen, letter, letter + 1);
                    }
                    (
                        false,
                        Letters::from_elem(first, 1),
                        Letters::from_elem(first + len - 1, 1),
                    )
                }
                Occurrence::Concat(l, r) => {
                    let mut first = analysis.first[l].clone();
                    if analysis.nullable[l] {
                        first.extend_from_slice(&analysis.first[r]);
                    }
                    let mut last = analysis.last[r].clone();
                    if analysis.nullable[r] {
                        last.extend_from_slice(&analysis.last[l]);
                    }
                    let (from, to) = (analysis.last[l].clone(), analysis.first[r].clone());
                    analysis.link_all(&mut seen, &from, &to);
                    (analysis.nullable[l] && analysis.nullable[r], first, last)
                }
                Occurrence::Alt(l, r) => {
                    let mut first = analysis.first[l].clone();
                    first.extend_from_slice(&analysis.first[r]);
                    let mut last = analysis.last[l].clone();
                    last.extend_from_slice(&analysis.last[r]);
                    (analysis.nullable[l] || analysis.nullable[r], first, last)
                }
                Occurrence::Star(inner) => {
                    let (from, to) = (analysis.last[inner].clone(), analysis.first[inner].clone());
                    analysis.link_all(&mut seen, &from, &to);
                    (true, to, from)
                }
            };
            analysis.nullable.push(nullable);
            analysis.first.push(first);
            analysis.last.push(last);
        }
        analysis
    }
}

/// Letter `l` lives in state `l + 1`; state 0 is the start.
const fn letter_state(letter: u32) -> StateId {
    StateId(letter + 1)
}

/// Builds one automaton for every expression at once.
///
/// The roots are joined by alternation and analysed in a single pass. Each
/// letter that can end root `i` is marked with root `i`'s group id. The start
/// state is never marked, so empty matches are not recognised.
#[must_use]
pub fn translate_all(regexes: &[Regex]) -> Nfa {
    let mut tree = PositionTree::default();
    let roots: SmallVec<[usize; 16]> = regexes.iter().map(|r| tree.lower(r.node())).collect();
    let top = roots
        .iter()
        .copied()
        .reduce(|acc, root| tree.push(Occurrence::Alt(acc, root)));

    let analysis = Analysis::run(&tree);

    let mut nfa = Nfa::empty();
    let start = nfa.add_state();
    for _ in &tree.letters {
        nfa.add_state();
    }
    nfa.set_entry(NfaEdge::epsilon(start));

    if let Some(top) = top {
        for &letter in &analysis.first[top] {
            for &c in &tree.letters[letter as usize] {
                nfa.add_edge(start, NfaEdge::on(c, letter_state(letter)));
            }
        }
    }
    for (from, targets) in analysis.follow.iter().enumerate() {
        let from = StateId::from_index(from + 1);
        for &to in targets {
            for &c in &tree.letters[to as usize] {
                nfa.add_edge(from, NfaEdge::on(c, letter_state(to)));
            }
        }
    }
    for (regex, &root) in regexes.iter().zip(&roots) {
        if let Some(group) = regex.group_id() {
            for &letter in &analysis.last[root] {
                nfa.set_matched(letter_state(letter), group);
            }
        }
    }
    nfa
}

/// Builds the position automaton of a single expression.
#[must_use]
pub fn translate(regex: &Regex) -> Nfa {
    translate_all(std::slice::from_ref(regex))
}
